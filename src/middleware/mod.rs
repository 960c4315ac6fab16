pub mod auth;
pub mod response;

pub use auth::{jwt_auth_middleware, require_hr_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
