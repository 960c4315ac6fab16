use axum::{Extension, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::user_service::RegisterInput;
use crate::services::UserService;
use crate::types::Role;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub salary: Decimal,
    pub join_date: NaiveDate,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    /// Defaults to the regular employee role.
    pub role: Option<Role>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        RegisterInput {
            username: req.username,
            password: req.password,
            name: req.name,
            salary: req.salary,
            join_date: req.join_date,
            department_id: req.department_id,
            position_id: req.position_id,
            role: req.role,
        }
    }
}

/// POST /api/register - Create a new employee account (HR only,
/// route-gated). All field problems are reported in one response.
pub async fn register(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<User> {
    let created = UserService::new()
        .await?
        .register(user.role, payload.into())
        .await?;
    Ok(ApiResponse::created(created))
}
