// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and liveness only. Inputs come from anonymous callers
// and are validated in full by the services.

pub mod auth;
pub mod health;

pub use auth::{login_post, register_post};
pub use health::health_get;
