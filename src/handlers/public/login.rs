use axum::Json;
use serde::Deserialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::auth_service::{AccessGrant, LoginOutcome};
use crate::services::{AuthService, LoginGate};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /hr/login - Authenticate an HR account and receive a token pair.
///
/// Accepts only accounts holding the HR role; everything else fails with
/// the same 401 as bad credentials.
pub async fn hr_login(Json(payload): Json<LoginRequest>) -> ApiResult<LoginOutcome> {
    let outcome = AuthService::new()
        .await?
        .login(&payload.username, &payload.password, LoginGate::HrOnly)
        .await?;
    Ok(ApiResponse::success(outcome))
}

/// POST /user/login - Authenticate any account and receive a token pair.
pub async fn user_login(Json(payload): Json<LoginRequest>) -> ApiResult<LoginOutcome> {
    let outcome = AuthService::new()
        .await?
        .login(&payload.username, &payload.password, LoginGate::AnyRole)
        .await?;
    Ok(ApiResponse::success(outcome))
}

/// POST /auth/refresh - Exchange a live refresh token for a new access token.
pub async fn refresh(Json(payload): Json<RefreshRequest>) -> ApiResult<AccessGrant> {
    let grant = AuthService::new().await?.refresh(&payload.refresh_token).await?;
    Ok(ApiResponse::success(grant))
}
