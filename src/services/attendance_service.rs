use chrono::{NaiveTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{is_unique_violation, ServiceError};
use crate::config;
use crate::database::models::Attendance;
use crate::database::DatabaseManager;
use crate::types::Role;

/// Late iff the check-in time of day is strictly after the office start
/// threshold; arriving exactly at the threshold is on time.
pub fn is_late(check_in: NaiveTime, office_start: NaiveTime) -> bool {
    check_in > office_start
}

pub struct AttendanceService {
    pool: PgPool,
}

impl AttendanceService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// First check-in of the day creates the row; any further attempt is a
    /// DuplicateCheckIn. The (user_id, work_date) unique index backs this,
    /// so two concurrent check-ins cannot both succeed.
    pub async fn check_in(&self, user_id: Uuid) -> Result<Attendance, ServiceError> {
        let now = Utc::now();
        let today = now.date_naive();
        let late = is_late(now.time(), config::config().attendance.office_start);

        let inserted: Result<Option<Attendance>, sqlx::Error> = sqlx::query_as(
            "INSERT INTO attendance (id, user_id, work_date, check_in, check_out, is_late)
             VALUES ($1, $2, $3, $4, NULL, $5)
             ON CONFLICT (user_id, work_date) DO NOTHING
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(today)
        .bind(now)
        .bind(late)
        .fetch_optional(&self.pool)
        .await;

        let row = match inserted {
            Ok(Some(row)) => row,
            Ok(None) => return Err(ServiceError::DuplicateCheckIn),
            Err(e) if is_unique_violation(&e, None) => return Err(ServiceError::DuplicateCheckIn),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user_id, late, "checked in");
        Ok(row)
    }

    /// Close today's open row. Fails when the user never checked in today or
    /// already checked out.
    pub async fn check_out(&self, user_id: Uuid) -> Result<Attendance, ServiceError> {
        let now = Utc::now();
        let today = now.date_naive();

        let row: Option<Attendance> =
            sqlx::query_as("SELECT * FROM attendance WHERE user_id = $1 AND work_date = $2")
                .bind(user_id)
                .bind(today)
                .fetch_optional(&self.pool)
                .await?;

        let row = row.ok_or(ServiceError::NoOpenCheckIn)?;
        if row.check_out.is_some() {
            return Err(ServiceError::AlreadyCheckedOut);
        }

        let updated: Attendance = sqlx::query_as(
            "UPDATE attendance SET check_out = $2 WHERE id = $1 AND check_out IS NULL RETURNING *",
        )
        .bind(row.id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::AlreadyCheckedOut)?;

        info!(user_id = %user_id, "checked out");
        Ok(updated)
    }

    /// Own history by default; HR may ask for another user's.
    pub async fn list(
        &self,
        requester_id: Uuid,
        requester_role: Role,
        target: Option<Uuid>,
    ) -> Result<Vec<Attendance>, ServiceError> {
        let subject = match target {
            Some(id) if id != requester_id => {
                if requester_role != Role::Hr {
                    return Err(ServiceError::permission_denied(
                        "only HR may view another user's attendance",
                    ));
                }
                id
            }
            _ => requester_id,
        };

        let rows = sqlx::query_as(
            "SELECT * FROM attendance WHERE user_id = $1 ORDER BY work_date, id",
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn after_threshold_is_late() {
        assert!(is_late(t(11, 45), t(11, 30)));
        assert!(is_late(t(9, 1), t(9, 0)));
    }

    #[test]
    fn at_or_before_threshold_is_not_late() {
        assert!(!is_late(t(11, 30), t(11, 30)));
        assert!(!is_late(t(8, 59), t(9, 0)));
    }
}
