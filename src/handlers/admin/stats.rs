// handlers/admin/stats.rs - GET /api/stats/admin handler

use axum::extract::Extension;

use crate::middleware::{AdminUser, ApiResponse, ApiResult, DbPool};
use crate::services::stats_service::AdminStats;
use crate::services::StatsService;

pub async fn admin(Extension(DbPool(pool)): Extension<DbPool>, _admin: AdminUser) -> ApiResult<AdminStats> {
    Ok(ApiResponse::success(StatsService::new(pool).admin().await?))
}
