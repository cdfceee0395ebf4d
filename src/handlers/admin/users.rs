// handlers/admin/users.rs - user management handlers

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::UserProfile;
use crate::middleware::{AdminUser, ApiResponse, ApiResult, DbPool};
use crate::services::user_service::UpdateUser;
use crate::services::{non_blank, UserService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub role: Option<String>,
}

/// GET /api/users?role=
pub async fn list(
    Query(query): Query<ListQuery>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<Vec<UserProfile>> {
    Ok(ApiResponse::success(UserService::new(pool).list(non_blank(&query.role)).await?))
}

/// GET /api/users/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(UserService::new(pool).select_404(id).await?))
}

/// PUT /api/users/:id - Profile fields, optionally role and provider
pub async fn put(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
    Json(payload): Json<UpdateUser>,
) -> ApiResult<UserProfile> {
    Ok(ApiResponse::success(UserService::new(pool).update_404(id, payload).await?))
}

/// DELETE /api/users/:id
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(DbPool(pool)): Extension<DbPool>,
    _admin: AdminUser,
) -> ApiResult<()> {
    UserService::new(pool).delete_404(id).await?;
    Ok(ApiResponse::success(()).with_message("User deleted successfully"))
}
