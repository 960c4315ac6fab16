use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::{Department, Position};
use crate::database::DatabaseManager;
use crate::types::Role;

/// Static reference data: departments and positions. Created by HR, listed
/// by anyone authenticated.
pub struct DirectoryService {
    pool: PgPool,
}

impl DirectoryService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn create_department(
        &self,
        actor_role: Role,
        name: &str,
    ) -> Result<Department, ServiceError> {
        if actor_role != Role::Hr {
            return Err(ServiceError::permission_denied("only HR may create departments"));
        }
        if name.trim().is_empty() {
            return Err(ServiceError::validation("name must not be empty"));
        }

        let department: Department = sqlx::query_as(
            "INSERT INTO departments (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await?;

        info!(department_id = %department.id, name = %department.name, "department created");
        Ok(department)
    }

    pub async fn list_departments(&self) -> Result<Vec<Department>, ServiceError> {
        let rows = sqlx::query_as("SELECT * FROM departments ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create_position(
        &self,
        actor_role: Role,
        title: &str,
        department_id: Option<Uuid>,
    ) -> Result<Position, ServiceError> {
        if actor_role != Role::Hr {
            return Err(ServiceError::permission_denied("only HR may create positions"));
        }
        if title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }
        if let Some(department_id) = department_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM departments WHERE id = $1)")
                    .bind(department_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                return Err(ServiceError::not_found("department not found"));
            }
        }

        let position: Position = sqlx::query_as(
            "INSERT INTO positions (id, title, department_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(title.trim())
        .bind(department_id)
        .fetch_one(&self.pool)
        .await?;

        info!(position_id = %position.id, title = %position.title, "position created");
        Ok(position)
    }

    pub async fn list_positions(&self) -> Result<Vec<Position>, ServiceError> {
        let rows = sqlx::query_as("SELECT * FROM positions ORDER BY title, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
