use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    pub check_in: DateTime<Utc>,
    /// Null while the row is still open (checked in, not yet out).
    pub check_out: Option<DateTime<Utc>>,
    pub is_late: bool,
}
