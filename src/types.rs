/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Account capability. An explicit two-variant type rather than a boolean
/// flag so permission checks stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    Hr,
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "leave_kind", rename_all = "snake_case")]
pub enum LeaveType {
    Casual,
    Sick,
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveType::Casual => write!(f, "casual"),
            LeaveType::Sick => write!(f, "sick"),
        }
    }
}

/// Work item state. Progress percentage is tracked separately and is not
/// derived from status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Hr).unwrap(), "\"hr\"");
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"employee\"");
        let parsed: Role = serde_json::from_str("\"hr\"").unwrap();
        assert_eq!(parsed, Role::Hr);
    }

    #[test]
    fn leave_type_round_trips() {
        let parsed: LeaveType = serde_json::from_str("\"sick\"").unwrap();
        assert_eq!(parsed, LeaveType::Sick);
        assert_eq!(LeaveType::Casual.to_string(), "casual");
    }

    #[test]
    fn task_status_round_trips() {
        let parsed: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
        assert_eq!(serde_json::to_string(&TaskStatus::NotStarted).unwrap(), "\"not_started\"");
    }
}
