use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Task;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::task_service::{NewTask, TaskChanges};
use crate::services::TaskService;
use crate::types::TaskStatus;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub progress: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub user_id: Option<Uuid>,
}

/// POST /api/tasks - Assign a task to a user (HR only, service-gated).
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> ApiResult<Task> {
    let task = TaskService::new()
        .await?
        .create(
            user.user_id,
            user.role,
            NewTask {
                user_id: payload.user_id,
                title: payload.title,
                description: payload.description,
                start_date: payload.start_date,
                due_date: payload.due_date,
            },
        )
        .await?;
    Ok(ApiResponse::created(task))
}

/// GET /api/tasks - Own tasks; HR may list everyone's or filter by user.
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Vec<Task>> {
    let rows = TaskService::new()
        .await?
        .list(user.user_id, user.role, query.user_id)
        .await?;
    Ok(ApiResponse::success(rows))
}

/// PUT /api/tasks/:id - Update status/progress/details (owner or HR).
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> ApiResult<Task> {
    let task = TaskService::new()
        .await?
        .update(
            user.user_id,
            user.role,
            id,
            TaskChanges {
                title: payload.title,
                description: payload.description,
                status: payload.status,
                progress: payload.progress,
                start_date: payload.start_date,
                due_date: payload.due_date,
            },
        )
        .await?;
    Ok(ApiResponse::success(task))
}
