// handlers/admin/providers.rs - provider write handlers

use axum::{
    extract::{Extension, Path},
    Json,
};

use crate::database::models::InsuranceProvider;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, DbPool};
use crate::services::provider_service::{CreateProvider, UpdateProvider};
use crate::services::ProviderService;

/// POST /api/providers
pub async fn post(
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<CreateProvider>,
) -> ApiResult<InsuranceProvider> {
    let provider = ProviderService::new(pool).create(payload).await?;
    Ok(ApiResponse::created(provider))
}

/// PUT /api/providers/:id - Partial update
pub async fn put(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<UpdateProvider>,
) -> ApiResult<InsuranceProvider> {
    Ok(ApiResponse::success(ProviderService::new(pool).update_404(&id, payload).await?))
}

/// DELETE /api/providers/:id
pub async fn delete(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<()> {
    ProviderService::new(pool).delete_404(&id).await?;
    Ok(ApiResponse::success(()).with_message("Insurance provider deleted successfully"))
}
