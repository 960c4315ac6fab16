// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request, with a machine-readable code for the specific rule
    BadRequest {
        code: &'static str,
        message: String,
    },
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict {
        code: &'static str,
        message: String,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest { message, .. } => message,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { code, .. } => code,
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "AUTHENTICATION_FAILED",
            ApiError::Forbidden(_) => "PERMISSION_DENIED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict { code, .. } => code,
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code(),
        });

        if let ApiError::ValidationError {
            field_errors: Some(field_errors),
            ..
        } = self
        {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: "BAD_REQUEST",
            message: message.into(),
        }
    }

    pub fn bad_request_with_code(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::AuthenticationFailed => {
                ApiError::unauthorized("invalid username or password")
            }
            ServiceError::PermissionDenied(msg) => ApiError::forbidden(msg),
            ServiceError::Validation {
                message,
                field_errors,
            } => ApiError::validation_error(message, field_errors),
            ServiceError::QuotaExceeded { .. } => {
                ApiError::bad_request_with_code("QUOTA_EXCEEDED", err.to_string())
            }
            ServiceError::DuplicateCheckIn => {
                ApiError::bad_request_with_code("DUPLICATE_CHECK_IN", err.to_string())
            }
            ServiceError::NoOpenCheckIn => {
                ApiError::bad_request_with_code("NO_OPEN_CHECK_IN", err.to_string())
            }
            ServiceError::AlreadyCheckedOut => {
                ApiError::bad_request_with_code("ALREADY_CHECKED_OUT", err.to_string())
            }
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::DuplicateUsername(_) => {
                ApiError::conflict("DUPLICATE_USERNAME", err.to_string())
            }
            ServiceError::Token(token_err) => ApiError::unauthorized(token_err.to_string()),
            ServiceError::Internal(msg) => {
                tracing::error!("internal service error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            ServiceError::Database(db_err) => {
                tracing::error!("database error: {}", db_err);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            ServiceError::Sqlx(sqlx_err) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeaveType;

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases: Vec<(ServiceError, StatusCode, &str)> = vec![
            (
                ServiceError::AuthenticationFailed,
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_FAILED",
            ),
            (
                ServiceError::permission_denied("nope"),
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
            ),
            (
                ServiceError::validation("bad dates"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ServiceError::QuotaExceeded {
                    leave_type: LeaveType::Casual,
                    taken: 8,
                    requested: 3,
                    cap: 10,
                },
                StatusCode::BAD_REQUEST,
                "QUOTA_EXCEEDED",
            ),
            (
                ServiceError::DuplicateCheckIn,
                StatusCode::BAD_REQUEST,
                "DUPLICATE_CHECK_IN",
            ),
            (
                ServiceError::NoOpenCheckIn,
                StatusCode::BAD_REQUEST,
                "NO_OPEN_CHECK_IN",
            ),
            (
                ServiceError::AlreadyCheckedOut,
                StatusCode::BAD_REQUEST,
                "ALREADY_CHECKED_OUT",
            ),
            (
                ServiceError::not_found("missing"),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                ServiceError::DuplicateUsername("asha".into()),
                StatusCode::CONFLICT,
                "DUPLICATE_USERNAME",
            ),
        ];

        for (service_err, status, code) in cases {
            let api_err: ApiError = service_err.into();
            assert_eq!(api_err.status_code(), status);
            assert_eq!(api_err.error_code(), code);
        }
    }

    #[test]
    fn validation_body_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("salary".to_string(), "salary must not be negative".to_string());
        let err = ApiError::validation_error("invalid registration fields", Some(fields));

        let body = err.to_json();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["salary"], "salary must not be negative");
    }

    #[test]
    fn quota_message_is_human_readable() {
        let api_err: ApiError = ServiceError::QuotaExceeded {
            leave_type: LeaveType::Casual,
            taken: 8,
            requested: 3,
            cap: 10,
        }
        .into();
        assert!(api_err.message().contains("casual"));
        assert!(api_err.message().contains("8"));
    }
}
