use axum::{extract::Query, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Attendance;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AttendanceService;

#[derive(Debug, Deserialize)]
pub struct AttendanceListQuery {
    pub user_id: Option<Uuid>,
}

/// POST /api/attendance/checkin - Open today's attendance row. A second
/// attempt on the same day is a 400.
pub async fn check_in(Extension(user): Extension<AuthUser>) -> ApiResult<Attendance> {
    let row = AttendanceService::new().await?.check_in(user.user_id).await?;
    Ok(ApiResponse::created(row))
}

/// POST /api/attendance/checkout - Close today's open row.
pub async fn check_out(Extension(user): Extension<AuthUser>) -> ApiResult<Attendance> {
    let row = AttendanceService::new().await?.check_out(user.user_id).await?;
    Ok(ApiResponse::success(row))
}

/// GET /api/attendance - Own history; HR may pass user_id for another's.
pub async fn list(
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AttendanceListQuery>,
) -> ApiResult<Vec<Attendance>> {
    let rows = AttendanceService::new()
        .await?
        .list(user.user_id, user.role, query.user_id)
        .await?;
    Ok(ApiResponse::success(rows))
}
