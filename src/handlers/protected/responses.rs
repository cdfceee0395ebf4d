// handlers/protected/responses.rs - form response handlers
//
// Every read goes through a ResponseScope derived from the caller, so an agent
// never sees another provider's responses regardless of the filters supplied.

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use uuid::Uuid;

use crate::database::models::{FormResponse, ResponseDetail};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, DbPool};
use crate::services::{ResponseFilters, ResponseScope, ResponseService, SaveResponse};

fn scope_of(user: &AuthUser) -> Result<ResponseScope, crate::error::ApiError> {
    Ok(ResponseScope::for_caller(user.role, user.user_id, user.insurance_provider_id.as_deref())?)
}

/// GET /api/responses - Filtered list, newest first
pub async fn list(
    Query(filters): Query<ResponseFilters>,
    Extension(DbPool(pool)): Extension<DbPool>,
    user: AuthUser,
) -> ApiResult<Vec<ResponseDetail>> {
    let scope = scope_of(&user)?;
    let responses = ResponseService::new(pool).list(&scope, filters).await?;
    Ok(ApiResponse::success(responses))
}

/// GET /api/responses/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    user: AuthUser,
) -> ApiResult<ResponseDetail> {
    let scope = scope_of(&user)?;
    Ok(ApiResponse::success(ResponseService::new(pool).select_404(&scope, id).await?))
}

/// GET /api/responses/user/section/:sectionId - Caller's own response, `data: null` when absent
pub async fn for_section(
    Path(section_id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    user: AuthUser,
) -> ApiResult<Option<FormResponse>> {
    let response = ResponseService::new(pool)
        .for_user_section(user.user_id, section_id)
        .await?;
    Ok(ApiResponse::success(response))
}

/// POST /api/responses/save - Create or update the caller's draft
pub async fn save(
    Extension(DbPool(pool)): Extension<DbPool>,
    user: AuthUser,
    Json(payload): Json<SaveResponse>,
) -> ApiResult<FormResponse> {
    let saved = ResponseService::new(pool).save(user.user_id, payload).await?;
    Ok(ApiResponse::success(saved).with_message("Response saved successfully"))
}

/// POST /api/responses/:id/submit
pub async fn submit(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    user: AuthUser,
) -> ApiResult<FormResponse> {
    let submitted = ResponseService::new(pool).submit(user.user_id, id).await?;
    Ok(ApiResponse::success(submitted).with_message("Response submitted successfully"))
}
