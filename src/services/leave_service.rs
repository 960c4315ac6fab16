use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::ServiceError;
use crate::config;
use crate::database::models::{Leave, User};
use crate::database::DatabaseManager;
use crate::types::{LeaveType, Role};

#[derive(Debug, Clone)]
pub struct LeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Inclusive duration of a leave in days. Fails when the range is reversed.
pub fn leave_duration_days(start_date: NaiveDate, end_date: NaiveDate) -> Result<i64, ServiceError> {
    if end_date < start_date {
        return Err(ServiceError::validation("end_date must not be before start_date"));
    }
    Ok((end_date - start_date).num_days() + 1)
}

/// Quota rule: a submission is rejected iff taken + requested > cap.
pub fn check_quota(
    leave_type: LeaveType,
    taken: i64,
    requested: i64,
    cap: i64,
) -> Result<(), ServiceError> {
    if taken + requested > cap {
        return Err(ServiceError::QuotaExceeded {
            leave_type,
            taken,
            requested,
            cap,
        });
    }
    Ok(())
}

fn cap_for(leave_type: LeaveType) -> i64 {
    let leave = &config::config().leave;
    match leave_type {
        LeaveType::Casual => leave.casual_cap_days,
        LeaveType::Sick => leave.sick_cap_days,
    }
}

pub struct LeaveService {
    pool: PgPool,
}

impl LeaveService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Record a leave request for `owner_id`. Regular users may only submit
    /// for themselves; HR may submit on anyone's behalf.
    ///
    /// The per-type taken count is recomputed from the leave ledger inside
    /// the transaction; the counters stored on the user row are treated as a
    /// cache and the ledger wins on discrepancy. Counters update at
    /// submission time, approval only flips the flag.
    pub async fn submit(
        &self,
        actor_id: Uuid,
        actor_role: Role,
        owner_id: Uuid,
        request: LeaveRequest,
    ) -> Result<Leave, ServiceError> {
        if owner_id != actor_id && actor_role != Role::Hr {
            return Err(ServiceError::permission_denied(
                "only HR may submit leave on behalf of another user",
            ));
        }

        let duration = leave_duration_days(request.start_date, request.end_date)?;
        let cap = cap_for(request.leave_type);

        let mut tx = self.pool.begin().await?;

        // Lock the owner row so concurrent submissions serialize per user.
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(owner_id)
            .fetch_optional(&mut *tx)
            .await?;
        let user = user.ok_or_else(|| ServiceError::not_found("user not found"))?;

        let taken: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(end_date - start_date + 1), 0)::bigint
             FROM leaves WHERE user_id = $1 AND leave_type = $2",
        )
        .bind(owner_id)
        .bind(request.leave_type)
        .fetch_one(&mut *tx)
        .await?;

        let stored = match request.leave_type {
            LeaveType::Casual => user.casual_leaves_taken as i64,
            LeaveType::Sick => user.sick_leaves_taken as i64,
        };
        if stored != taken {
            warn!(
                user_id = %owner_id,
                leave_type = %request.leave_type,
                stored,
                ledger = taken,
                "leave counter drift detected, using ledger value"
            );
        }

        check_quota(request.leave_type, taken, duration, cap)?;

        let leave: Leave = sqlx::query_as(
            "INSERT INTO leaves (id, user_id, leave_type, start_date, end_date, is_approved)
             VALUES ($1, $2, $3, $4, $5, false)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&mut *tx)
        .await?;

        self.refresh_counters(&mut tx, owner_id).await?;

        tx.commit().await?;

        info!(
            user_id = %owner_id,
            leave_id = %leave.id,
            leave_type = %leave.leave_type,
            days = duration,
            "leave request submitted"
        );
        Ok(leave)
    }

    /// Rewrite the cached counters on the user row from the ledger.
    async fn refresh_counters(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
    ) -> Result<(), ServiceError> {
        let (casual, sick): (i64, i64) = sqlx::query_as(
            "SELECT
                 COALESCE(SUM(end_date - start_date + 1) FILTER (WHERE leave_type = 'casual'), 0)::bigint,
                 COALESCE(SUM(end_date - start_date + 1) FILTER (WHERE leave_type = 'sick'), 0)::bigint
             FROM leaves WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;

        let allowance = config::config().leave.annual_allowance;
        let remaining = (allowance - (casual + sick)).max(0);

        sqlx::query(
            "UPDATE users
             SET casual_leaves_taken = $2, sick_leaves_taken = $3, remaining_leaves = $4,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(casual as i32)
        .bind(sick as i32)
        .bind(remaining as i32)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Flip a leave to approved. Only HR may approve.
    pub async fn approve(
        &self,
        approver_id: Uuid,
        approver_role: Role,
        leave_id: Uuid,
    ) -> Result<Leave, ServiceError> {
        match approver_role {
            Role::Hr => {}
            Role::Employee => {
                warn!(user_id = %approver_id, leave_id = %leave_id, "non-HR approval attempt");
                return Err(ServiceError::permission_denied("only HR may approve leave requests"));
            }
        }

        let leave: Option<Leave> =
            sqlx::query_as("UPDATE leaves SET is_approved = true WHERE id = $1 RETURNING *")
                .bind(leave_id)
                .fetch_optional(&self.pool)
                .await?;

        let leave = leave.ok_or_else(|| ServiceError::not_found("leave request not found"))?;
        info!(leave_id = %leave.id, approver = %approver_id, "leave approved");
        Ok(leave)
    }

    /// HR sees every leave row; a regular user sees only their own.
    pub async fn list(&self, requester_id: Uuid, requester_role: Role) -> Result<Vec<Leave>, ServiceError> {
        let rows = match requester_role {
            Role::Hr => {
                sqlx::query_as("SELECT * FROM leaves ORDER BY created_at, id")
                    .fetch_all(&self.pool)
                    .await?
            }
            Role::Employee => {
                sqlx::query_as("SELECT * FROM leaves WHERE user_id = $1 ORDER BY created_at, id")
                    .bind(requester_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_is_inclusive() {
        assert_eq!(leave_duration_days(date(2023, 7, 1), date(2023, 7, 3)).unwrap(), 3);
        assert_eq!(leave_duration_days(date(2023, 7, 1), date(2023, 7, 1)).unwrap(), 1);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = leave_duration_days(date(2023, 7, 3), date(2023, 7, 1)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));
    }

    #[test]
    fn quota_rejects_over_cap() {
        // 8 days taken + 3 requested > 10
        let err = check_quota(LeaveType::Casual, 8, 3, 10).unwrap_err();
        match err {
            ServiceError::QuotaExceeded { taken, requested, cap, .. } => {
                assert_eq!((taken, requested, cap), (8, 3, 10));
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
    }

    #[test]
    fn quota_allows_exactly_at_cap() {
        // 7 taken + 3 requested == 10 is accepted
        assert!(check_quota(LeaveType::Casual, 7, 3, 10).is_ok());
    }

    #[test]
    fn quota_types_are_independent_caps() {
        assert!(check_quota(LeaveType::Sick, 0, 10, 10).is_ok());
        assert!(check_quota(LeaveType::Sick, 0, 11, 10).is_err());
    }
}
