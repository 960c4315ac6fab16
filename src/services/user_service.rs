use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{is_unique_violation, ServiceError};
use crate::config::{self, Environment};
use crate::database::models::{Attendance, Leave, Task, User};
use crate::database::DatabaseManager;
use crate::types::Role;

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub name: String,
    pub salary: Decimal,
    pub join_date: NaiveDate,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub role: Option<Role>,
}

/// Identity joined with everything the user owns.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub user: User,
    pub leaves: Vec<Leave>,
    pub tasks: Vec<Task>,
    pub attendance: Vec<Attendance>,
}

/// Field-level checks that need no database access. All problems are
/// reported at once rather than one per request.
pub fn field_errors(input: &RegisterInput) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    if input.username.trim().is_empty() {
        errors.insert("username".into(), "username must not be empty".into());
    }
    if input.password.is_empty() {
        errors.insert("password".into(), "password must not be empty".into());
    }
    if input.name.trim().is_empty() {
        errors.insert("name".into(), "name must not be empty".into());
    }
    if input.salary < Decimal::ZERO {
        errors.insert("salary".into(), "salary must not be negative".into());
    }
    errors
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Create an identity row. Registration is an HR-only action; new
    /// accounts start with zero taken leave and the full allowance.
    pub async fn register(
        &self,
        actor_role: Role,
        input: RegisterInput,
    ) -> Result<User, ServiceError> {
        if actor_role != Role::Hr {
            return Err(ServiceError::permission_denied("only HR may register users"));
        }

        let mut errors = field_errors(&input);

        if let Some(department_id) = input.department_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM departments WHERE id = $1)")
                    .bind(department_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                errors.insert("department_id".into(), "department does not exist".into());
            }
        }
        if let Some(position_id) = input.position_id {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM positions WHERE id = $1)")
                    .bind(position_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !exists {
                errors.insert("position_id".into(), "position does not exist".into());
            }
        }

        if !errors.is_empty() {
            return Err(ServiceError::field_validation("invalid registration fields", errors));
        }

        let password_hash = User::hash_password(&input.password)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
        let allowance = config::config().leave.annual_allowance as i32;
        let username = input.username.trim().to_string();

        let created: Result<User, sqlx::Error> = sqlx::query_as(
            "INSERT INTO users
                 (id, username, password_hash, name, salary, join_date,
                  department_id, position_id, role,
                  casual_leaves_taken, sick_leaves_taken, remaining_leaves)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, 0, $10)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&username)
        .bind(password_hash)
        .bind(input.name.trim())
        .bind(input.salary)
        .bind(input.join_date)
        .bind(input.department_id)
        .bind(input.position_id)
        .bind(input.role.unwrap_or(Role::Employee))
        .bind(allowance)
        .fetch_one(&self.pool)
        .await;

        let user = match created {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e, Some("users_username_key")) => {
                return Err(ServiceError::DuplicateUsername(username));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, username = %user.username, role = ?user.role, "user registered");
        Ok(user)
    }

    pub async fn by_id(&self, user_id: Uuid) -> Result<User, ServiceError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        user.ok_or_else(|| ServiceError::not_found("user not found"))
    }

    /// Full projection used by both the self profile and the HR view.
    /// Collections are ordered deterministically so repeated reads return
    /// identical bodies.
    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, ServiceError> {
        let user = self.by_id(user_id).await?;

        let leaves: Vec<Leave> =
            sqlx::query_as("SELECT * FROM leaves WHERE user_id = $1 ORDER BY created_at, id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        let tasks: Vec<Task> =
            sqlx::query_as("SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at, id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        let attendance: Vec<Attendance> =
            sqlx::query_as("SELECT * FROM attendance WHERE user_id = $1 ORDER BY work_date, id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(UserProfile {
            user,
            leaves,
            tasks,
            attendance,
        })
    }

    /// Registration is HR-only, so a fresh database would be unreachable.
    /// Seed one HR account from the environment when none exists.
    pub async fn bootstrap_admin(&self) -> Result<(), ServiceError> {
        let hr_count: i64 = sqlx::query_scalar("SELECT count(*) FROM users WHERE role = 'hr'")
            .fetch_one(&self.pool)
            .await?;
        if hr_count > 0 {
            return Ok(());
        }

        let username =
            std::env::var("BOOTSTRAP_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let password = match std::env::var("BOOTSTRAP_ADMIN_PASSWORD") {
            Ok(p) if !p.is_empty() => p,
            _ => {
                if matches!(config::config().environment, Environment::Development) {
                    "admin".to_string()
                } else {
                    warn!("no HR account exists and BOOTSTRAP_ADMIN_PASSWORD is unset, skipping bootstrap");
                    return Ok(());
                }
            }
        };

        let password_hash = User::hash_password(&password)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))?;
        let allowance = config::config().leave.annual_allowance as i32;

        sqlx::query(
            "INSERT INTO users
                 (id, username, password_hash, name, salary, join_date, role,
                  casual_leaves_taken, sick_leaves_taken, remaining_leaves)
             VALUES ($1, $2, $3, $4, 0, CURRENT_DATE, 'hr', 0, 0, $5)
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(&username)
        .bind(password_hash)
        .bind("Administrator")
        .bind(allowance)
        .execute(&self.pool)
        .await?;

        info!(username = %username, "bootstrapped initial HR account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RegisterInput {
        RegisterInput {
            username: "ravi".into(),
            password: "pw".into(),
            name: "Ravi Iyer".into(),
            salary: Decimal::new(42_000, 0),
            join_date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            department_id: None,
            position_id: None,
            role: None,
        }
    }

    #[test]
    fn valid_input_has_no_field_errors() {
        assert!(field_errors(&input()).is_empty());
    }

    #[test]
    fn all_problems_reported_at_once() {
        let bad = RegisterInput {
            username: "  ".into(),
            password: String::new(),
            name: String::new(),
            salary: Decimal::new(-1, 0),
            ..input()
        };
        let errors = field_errors(&bad);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains_key("username"));
        assert!(errors.contains_key("password"));
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("salary"));
    }
}
