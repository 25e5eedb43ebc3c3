//! Error types for catalog resolution.

use super::retry::{RetryError, Retryable};

/// Failure reported by a single [`CatalogBackend`](super::CatalogBackend) lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogBackendError {
    /// Temporary failure; the lookup may succeed if attempted again.
    #[error("catalog temporarily unavailable: {0}")]
    Transient(String),

    /// Permanent failure; retrying will not help.
    #[error("catalog backend failure: {0}")]
    Backend(String),
}

impl Retryable for CatalogBackendError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Error returned by [`CatalogResolver::resolve`](super::CatalogResolver::resolve).
///
/// An unknown target is not an error; it resolves to `Ok(None)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable after {attempts} attempts: {message}")]
    Unavailable { attempts: u32, message: String },

    #[error("catalog backend error: {0}")]
    Backend(String),

    #[error("catalog lookup cancelled")]
    Cancelled,
}

impl From<RetryError<CatalogBackendError>> for CatalogError {
    fn from(err: RetryError<CatalogBackendError>) -> Self {
        match err {
            RetryError::Cancelled { .. } => CatalogError::Cancelled,
            RetryError::Exhausted { attempts, last } => CatalogError::Unavailable {
                attempts,
                message: last.to_string(),
            },
            RetryError::Terminal(e) => CatalogError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(CatalogBackendError::Transient("timeout".into()).is_retryable());
        assert!(!CatalogBackendError::Backend("corrupt".into()).is_retryable());
    }

    #[test]
    fn test_exhausted_maps_to_unavailable() {
        let err: CatalogError = RetryError::Exhausted {
            attempts: 5,
            last: CatalogBackendError::Transient("timeout".into()),
        }
        .into();
        assert_eq!(
            err,
            CatalogError::Unavailable {
                attempts: 5,
                message: "catalog temporarily unavailable: timeout".into()
            }
        );
    }
}
