use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Department, Position};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::DirectoryService;

#[derive(Debug, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePositionRequest {
    pub title: String,
    pub department_id: Option<Uuid>,
}

/// POST /api/departments - Create a department (HR only, service-gated).
pub async fn department_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> ApiResult<Department> {
    let department = DirectoryService::new()
        .await?
        .create_department(user.role, &payload.name)
        .await?;
    Ok(ApiResponse::created(department))
}

/// GET /api/departments
pub async fn department_list() -> ApiResult<Vec<Department>> {
    let rows = DirectoryService::new().await?.list_departments().await?;
    Ok(ApiResponse::success(rows))
}

/// POST /api/positions - Create a position (HR only, service-gated).
pub async fn position_create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreatePositionRequest>,
) -> ApiResult<Position> {
    let position = DirectoryService::new()
        .await?
        .create_position(user.role, &payload.title, payload.department_id)
        .await?;
    Ok(ApiResponse::created(position))
}

/// GET /api/positions
pub async fn position_list() -> ApiResult<Vec<Position>> {
    let rows = DirectoryService::new().await?.list_positions().await?;
    Ok(ApiResponse::success(rows))
}
