pub mod provider_service;
pub mod question_service;
pub mod response_service;
pub mod section_service;
pub mod stats_service;
pub mod user_service;

pub use provider_service::ProviderService;
pub use question_service::QuestionService;
pub use response_service::{ResponseFilters, ResponseScope, ResponseService, SaveResponse};
pub use section_service::SectionService;
pub use stats_service::StatsService;
pub use user_service::UserService;

use thiserror::Error;

use crate::auth::JwtError;
use crate::database::manager::DatabaseError;

/// Errors shared by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request was understood but refused (400)
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] JwtError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(DatabaseError::Sqlx(err))
    }
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::Invalid(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }
}

/// Treat a blank optional string as missing
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
