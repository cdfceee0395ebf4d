pub mod auth;
pub mod pool;
pub mod response;

pub use auth::{jwt_auth_middleware, AdminUser, AgentUser, AuthUser};
pub use pool::{db_pool_middleware, DbPool};
pub use response::{ApiResponse, ApiResult};
