// handlers/public/auth.rs - POST /api/auth/register and POST /api/auth/login handlers

use axum::{extract::Extension, Json};

use crate::middleware::{ApiResponse, ApiResult, DbPool};
use crate::services::user_service::{AuthSession, LoginRequest, RegisterRequest};
use crate::services::UserService;

/// POST /api/auth/register - Create an account and return `{user, token}`
pub async fn register_post(
    Extension(DbPool(pool)): Extension<DbPool>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<AuthSession> {
    let session = UserService::new(pool).register(payload).await?;
    Ok(ApiResponse::created(session).with_message("User registered successfully"))
}

/// POST /api/auth/login - Verify credentials for the requested role
pub async fn login_post(
    Extension(DbPool(pool)): Extension<DbPool>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<AuthSession> {
    let session = UserService::new(pool).login(payload).await?;
    Ok(ApiResponse::success(session).with_message("Login successful"))
}
