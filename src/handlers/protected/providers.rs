// handlers/protected/providers.rs - GET /api/providers and GET /api/providers/:id handlers

use axum::extract::{Extension, Path};

use crate::database::models::InsuranceProvider;
use crate::middleware::{ApiResponse, ApiResult, DbPool};
use crate::services::ProviderService;

/// GET /api/providers - All providers, alphabetical
pub async fn list(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Vec<InsuranceProvider>> {
    Ok(ApiResponse::success(ProviderService::new(pool).list().await?))
}

/// GET /api/providers/:id
pub async fn get(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
) -> ApiResult<InsuranceProvider> {
    Ok(ApiResponse::success(ProviderService::new(pool).select_404(&id).await?))
}
