use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::database::models::Task;
use crate::database::DatabaseManager;
use crate::types::{Role, TaskStatus};

#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Partial update; absent fields keep their stored values. Status and
/// progress are set independently, no correlation is enforced.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

fn validate_progress(progress: i32) -> Result<(), ServiceError> {
    if !(0..=100).contains(&progress) {
        return Err(ServiceError::validation("progress must be between 0 and 100"));
    }
    Ok(())
}

pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Tasks are created and assigned by HR.
    pub async fn create(
        &self,
        actor_id: Uuid,
        actor_role: Role,
        task: NewTask,
    ) -> Result<Task, ServiceError> {
        if actor_role != Role::Hr {
            return Err(ServiceError::permission_denied("only HR may assign tasks"));
        }
        if task.title.trim().is_empty() {
            return Err(ServiceError::validation("title must not be empty"));
        }
        if task.due_date < task.start_date {
            return Err(ServiceError::validation("due_date must not be before start_date"));
        }

        let owner_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(task.user_id)
                .fetch_one(&self.pool)
                .await?;
        if !owner_exists {
            return Err(ServiceError::not_found("assignee not found"));
        }

        let created: Task = sqlx::query_as(
            "INSERT INTO tasks (id, user_id, title, description, start_date, due_date, status, progress)
             VALUES ($1, $2, $3, $4, $5, $6, 'not_started', 0)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(task.user_id)
        .bind(task.title.trim())
        .bind(task.description.unwrap_or_default())
        .bind(task.start_date)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await?;

        info!(task_id = %created.id, assignee = %created.user_id, assigned_by = %actor_id, "task created");
        Ok(created)
    }

    /// Own tasks for regular users; HR sees all, optionally filtered by user.
    pub async fn list(
        &self,
        requester_id: Uuid,
        requester_role: Role,
        filter_user: Option<Uuid>,
    ) -> Result<Vec<Task>, ServiceError> {
        let subject = match requester_role {
            Role::Hr => filter_user,
            Role::Employee => {
                if matches!(filter_user, Some(id) if id != requester_id) {
                    return Err(ServiceError::permission_denied(
                        "only HR may view another user's tasks",
                    ));
                }
                Some(requester_id)
            }
        };

        let rows = match subject {
            Some(user_id) => {
                sqlx::query_as("SELECT * FROM tasks WHERE user_id = $1 ORDER BY created_at, id")
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM tasks ORDER BY created_at, id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Owner or HR may update. Dates must stay coherent after the merge.
    pub async fn update(
        &self,
        actor_id: Uuid,
        actor_role: Role,
        task_id: Uuid,
        changes: TaskChanges,
    ) -> Result<Task, ServiceError> {
        let existing: Option<Task> = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        let existing = existing.ok_or_else(|| ServiceError::not_found("task not found"))?;

        if existing.user_id != actor_id && actor_role != Role::Hr {
            return Err(ServiceError::permission_denied("not your task"));
        }

        if let Some(progress) = changes.progress {
            validate_progress(progress)?;
        }
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(ServiceError::validation("title must not be empty"));
            }
        }

        let start = changes.start_date.unwrap_or(existing.start_date);
        let due = changes.due_date.unwrap_or(existing.due_date);
        if due < start {
            return Err(ServiceError::validation("due_date must not be before start_date"));
        }

        let updated: Task = sqlx::query_as(
            "UPDATE tasks
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 status = COALESCE($4, status),
                 progress = COALESCE($5, progress),
                 start_date = COALESCE($6, start_date),
                 due_date = COALESCE($7, due_date),
                 updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(task_id)
        .bind(changes.title.as_deref().map(str::trim))
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.progress)
        .bind(changes.start_date)
        .bind(changes.due_date)
        .fetch_one(&self.pool)
        .await?;

        info!(task_id = %updated.id, updated_by = %actor_id, "task updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bounds() {
        assert!(validate_progress(0).is_ok());
        assert!(validate_progress(100).is_ok());
        assert!(validate_progress(-1).is_err());
        assert!(validate_progress(101).is_err());
    }
}
