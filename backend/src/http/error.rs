//! HTTP error handling and response types.
//!
//! Every error leaves the API as an `application/problem+json` document.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

pub const PROBLEM_JSON: &str = "application/problem+json";

/// Problem details response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ProblemDetails {
    pub fn new(status: StatusCode, code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            problem_type: "about:blank".to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            code: code.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Catalog exhausted its retries or the server is shutting down
    ServiceUnavailable(String),
    /// Internal server error
    Internal(String),
    Repository(RepositoryError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::Repository(RepositoryError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            AppError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REPOSITORY_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let detail = match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::Internal(msg) => msg,
            AppError::Repository(e) => e.to_string(),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), code, detail = %detail, "Request failed");
        }

        let body = ProblemDetails::new(status, code, detail);
        (status, [(header::CONTENT_TYPE, PROBLEM_JSON)], Json(body)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::CatalogUnavailable(msg) => AppError::ServiceUnavailable(msg),
            ServiceError::Cancelled => {
                AppError::ServiceUnavailable("Request cancelled, server is shutting down".to_string())
            }
            ServiceError::Catalog(msg) => AppError::Internal(msg),
            ServiceError::Repository(e) => AppError::Repository(e),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ErrorContext;

    #[test]
    fn test_service_errors_map_to_status() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("gone"), StatusCode::NOT_FOUND),
            (
                ServiceError::CatalogUnavailable("down".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ServiceError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
            (
                ServiceError::Catalog("corrupt".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_repository_not_found_is_404() {
        let err = RepositoryError::not_found_with_context("missing", ErrorContext::new("get"));
        let response = AppError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(RepositoryError::internal("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_problem_json_content_type() {
        let response = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_JSON
        );
    }

    #[test]
    fn test_anyhow_is_internal() {
        let err: AppError = anyhow::anyhow!("unexpected").into();
        assert!(matches!(err, AppError::Internal(ref m) if m == "unexpected"));
    }
}
