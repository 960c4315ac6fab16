use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::AuthService;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

/// GET /api/auth/whoami - Identity behind the presented access token.
pub async fn whoami(Extension(user): Extension<AuthUser>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        id: user.user_id,
        username: user.username,
        role: user.role,
    }))
}

/// POST /api/auth/logout - Revoke the presented refresh token.
///
/// Revocation is one-way; presenting the same token again is a 400.
pub async fn logout(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LogoutRequest>,
) -> ApiResult<()> {
    AuthService::new().await?.logout(&payload.refresh_token).await?;
    tracing::info!(user_id = %user.user_id, "user logged out");
    Ok(ApiResponse::<()>::reset_content())
}
