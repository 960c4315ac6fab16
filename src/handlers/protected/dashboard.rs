use crate::middleware::{ApiResponse, ApiResult};
use crate::services::dashboard_service::UserLeaveSummary;
use crate::services::DashboardService;

/// GET /api/hr/dashboard - Per-user leave aggregate (HR only, route-gated).
/// Recomputed from the leave ledger on every request.
pub async fn overview() -> ApiResult<Vec<UserLeaveSummary>> {
    let rows = DashboardService::new().await?.overview().await?;
    Ok(ApiResponse::success(rows))
}
