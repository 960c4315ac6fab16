use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub id: Uuid,
    pub title: String,
    /// Null when the owning department was removed.
    pub department_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
