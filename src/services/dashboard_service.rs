use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::ServiceError;
use crate::database::DatabaseManager;

/// One dashboard line per user. pending + approved always equals the total
/// number of leave rows the user owns.
#[derive(Debug, Serialize, FromRow)]
pub struct UserLeaveSummary {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub remaining_leaves: i32,
    pub pending_leaves: i64,
    pub approved_leaves: i64,
}

/// Read-only projection over identity and the leave ledger. Recomputed in
/// full on every request, no caching.
pub struct DashboardService {
    pool: PgPool,
}

impl DashboardService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn overview(&self) -> Result<Vec<UserLeaveSummary>, ServiceError> {
        let rows = sqlx::query_as(
            "SELECT u.id, u.username, u.name, u.remaining_leaves,
                    COUNT(l.id) FILTER (WHERE l.is_approved = false) AS pending_leaves,
                    COUNT(l.id) FILTER (WHERE l.is_approved = true) AS approved_leaves
             FROM users u
             LEFT JOIN leaves l ON l.user_id = u.id
             GROUP BY u.id, u.username, u.name, u.remaining_leaves
             ORDER BY u.name, u.id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
