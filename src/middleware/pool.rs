use axum::{extract::Request, middleware::Next, response::Response};
use sqlx::PgPool;

use crate::database::DatabaseManager;
use crate::error::ApiError;

/// Shared database pool, injected by middleware
#[derive(Clone)]
pub struct DbPool(pub PgPool);

/// Makes the pool available to handlers as `Extension<DbPool>`.
/// The pool connects lazily, so requests that fail before touching storage never need a database.
pub async fn db_pool_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let pool = DatabaseManager::pool().await?;
    request.extensions_mut().insert(DbPool(pool));
    Ok(next.run(request).await)
}
