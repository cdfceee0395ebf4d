// handlers/protected/sections.rs - read-only section handlers

use axum::extract::{Extension, Path, Query};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Question, SectionWithQuestions};
use crate::middleware::{ApiResponse, ApiResult, DbPool};
use crate::services::{non_blank, SectionService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub insurance_provider_id: Option<String>,
}

/// GET /api/sections?insuranceProviderId= - Sections with their questions nested
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(DbPool(pool)): Extension<DbPool>,
) -> ApiResult<Vec<SectionWithQuestions>> {
    let sections = SectionService::new(pool)
        .list(non_blank(&query.insurance_provider_id))
        .await?;
    Ok(ApiResponse::success(sections))
}

/// GET /api/sections/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
) -> ApiResult<SectionWithQuestions> {
    Ok(ApiResponse::success(SectionService::new(pool).select_404(id).await?))
}

/// GET /api/sections/:id/questions - Questions in display order
pub async fn questions(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
) -> ApiResult<Vec<Question>> {
    Ok(ApiResponse::success(SectionService::new(pool).questions(id).await?))
}
