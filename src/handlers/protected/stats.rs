// handlers/protected/stats.rs - GET /api/stats/agent handler

use axum::extract::Extension;

use crate::middleware::{AgentUser, ApiResponse, ApiResult, DbPool};
use crate::services::stats_service::AgentStats;
use crate::services::StatsService;

pub async fn agent(
    Extension(DbPool(pool)): Extension<DbPool>,
    AgentUser(agent): AgentUser,
) -> ApiResult<AgentStats> {
    let stats = StatsService::new(pool)
        .agent(agent.insurance_provider_id.as_deref())
        .await?;
    Ok(ApiResponse::success(stats))
}
