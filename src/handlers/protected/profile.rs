use axum::{extract::Path, Extension};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::UserProfile;
use crate::services::UserService;

/// GET /api/profile - The caller's identity with their leaves, tasks and
/// attendance history.
pub async fn me(Extension(user): Extension<AuthUser>) -> ApiResult<UserProfile> {
    let profile = UserService::new().await?.profile(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}

/// GET /api/hr/users/:id - Any user's profile, HR only (route-gated).
pub async fn user_by_id(Path(id): Path<Uuid>) -> ApiResult<UserProfile> {
    let profile = UserService::new().await?.profile(id).await?;
    Ok(ApiResponse::success(profile))
}
