use axum::{extract::Path, Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Leave;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::leave_service::LeaveRequest;
use crate::services::LeaveService;
use crate::types::LeaveType;

#[derive(Debug, Deserialize)]
pub struct SubmitLeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// HR may submit on another user's behalf; defaults to the caller.
    pub user_id: Option<Uuid>,
}

/// POST /api/leaves - Submit a leave request. Rejected when the date range
/// is reversed or the per-type quota would be exceeded.
pub async fn submit(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SubmitLeaveRequest>,
) -> ApiResult<Leave> {
    let owner_id = payload.user_id.unwrap_or(user.user_id);
    let leave = LeaveService::new()
        .await?
        .submit(
            user.user_id,
            user.role,
            owner_id,
            LeaveRequest {
                leave_type: payload.leave_type,
                start_date: payload.start_date,
                end_date: payload.end_date,
            },
        )
        .await?;
    Ok(ApiResponse::created(leave))
}

/// GET /api/leaves - HR sees all leave rows, everyone else their own.
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Leave>> {
    let rows = LeaveService::new().await?.list(user.user_id, user.role).await?;
    Ok(ApiResponse::success(rows))
}

/// PUT /api/leaves/:id - Approve a leave request (HR only, service-gated).
pub async fn approve(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Leave> {
    let leave = LeaveService::new()
        .await?
        .approve(user.user_id, user.role, id)
        .await?;
    Ok(ApiResponse::success(leave))
}
