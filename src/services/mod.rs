pub mod attendance_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod directory_service;
pub mod leave_service;
pub mod task_service;
pub mod user_service;

pub use attendance_service::AttendanceService;
pub use auth_service::{AuthService, LoginGate};
pub use dashboard_service::DashboardService;
pub use directory_service::DirectoryService;
pub use leave_service::LeaveService;
pub use task_service::TaskService;
pub use user_service::UserService;

use std::collections::HashMap;

use thiserror::Error;

use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::types::LeaveType;

/// Domain errors shared by the service layer. Each request either fully
/// commits or fails with one of these; none are retried internally.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid username or password")]
    AuthenticationFailed,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("{leave_type} leave quota exceeded: {taken} day(s) taken + {requested} requested > {cap} cap")]
    QuotaExceeded {
        leave_type: LeaveType,
        taken: i64,
        requested: i64,
        cap: i64,
    },

    #[error("already checked in today")]
    DuplicateCheckIn,

    #[error("no open check-in found for today")]
    NoOpenCheckIn,

    #[error("already checked out today")]
    AlreadyCheckedOut,

    #[error("{0}")]
    NotFound(String),

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn field_validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        ServiceError::PermissionDenied(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

/// True when the error is a Postgres unique violation, optionally on a
/// specific constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: Option<&str>) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() != Some("23505") {
            return false;
        }
        match constraint {
            Some(name) => db_err.constraint() == Some(name),
            None => true,
        }
    } else {
        false
    }
}
