//! Errors raised by the service layer.

use crate::catalog::CatalogError;
use crate::db::repository::RepositoryError;
use crate::models::CoordinateError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad input from the caller. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The catalog kept failing transiently until the retry budget ran out.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<CatalogError> for ServiceError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unavailable { .. } => Self::CatalogUnavailable(err.to_string()),
            CatalogError::Backend(message) => Self::Catalog(message),
            CatalogError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CoordinateError> for ServiceError {
    fn from(err: CoordinateError) -> Self {
        Self::Validation(err.to_string())
    }
}
