// handlers/protected/profile.rs - GET /api/auth/profile handler

use axum::extract::Extension;

use crate::database::models::UserProfile;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, DbPool};
use crate::services::UserService;

pub async fn get(Extension(DbPool(pool)): Extension<DbPool>, user: AuthUser) -> ApiResult<UserProfile> {
    let profile = UserService::new(pool).select_404(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}
