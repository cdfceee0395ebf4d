// handlers/admin/sections.rs - section and per-section question write handlers

use axum::{
    extract::{Extension, Path},
    Json,
};
use uuid::Uuid;

use crate::database::models::{Question, Section, SectionWithQuestions};
use crate::middleware::{AdminUser, ApiResponse, ApiResult, DbPool};
use crate::services::section_service::{CreateQuestion, CreateSection, ReorderQuestions, UpdateSection};
use crate::services::SectionService;

/// POST /api/sections
pub async fn post(
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<CreateSection>,
) -> ApiResult<SectionWithQuestions> {
    Ok(ApiResponse::created(SectionService::new(pool).create(payload).await?))
}

/// PUT /api/sections/:id
pub async fn put(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<UpdateSection>,
) -> ApiResult<Section> {
    Ok(ApiResponse::success(SectionService::new(pool).update_404(id, payload).await?))
}

/// DELETE /api/sections/:id - Questions and responses go with it
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<()> {
    SectionService::new(pool).delete_404(id).await?;
    Ok(ApiResponse::success(()).with_message("Section deleted successfully"))
}

/// POST /api/sections/:id/questions - Add a single question
pub async fn question_post(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<CreateQuestion>,
) -> ApiResult<Question> {
    Ok(ApiResponse::created(SectionService::new(pool).create_question(id, payload).await?))
}

/// PUT /api/sections/:id/questions/reorder - `{questionIds: [...]}`
pub async fn reorder(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<ReorderQuestions>,
) -> ApiResult<()> {
    SectionService::new(pool).reorder_questions(id, payload).await?;
    Ok(ApiResponse::success(()).with_message("Questions reordered successfully"))
}
