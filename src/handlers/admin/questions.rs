// handlers/admin/questions.rs - GET /api/questions, PUT/DELETE /api/questions/:id handlers

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Question;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, DbPool};
use crate::services::question_service::UpdateQuestion;
use crate::services::QuestionService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub section_id: Option<Uuid>,
}

pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<Vec<Question>> {
    Ok(ApiResponse::success(QuestionService::new(pool).list(query.section_id).await?))
}

pub async fn put(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<UpdateQuestion>,
) -> ApiResult<Question> {
    Ok(ApiResponse::success(QuestionService::new(pool).update_404(id, payload).await?))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<()> {
    QuestionService::new(pool).delete_404(id).await?;
    Ok(ApiResponse::success(()).with_message("Question deleted successfully"))
}
