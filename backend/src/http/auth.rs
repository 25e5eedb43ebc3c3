//! API key middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::error::AppError;
use super::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests without a usable `X-API-Key` header.
///
/// When the server has a configured key the header must match it exactly,
/// surrounding whitespace included; otherwise any non-blank value is accepted.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing X-API-Key header".to_string()))?;

    if let Some(expected) = state.api_key.as_deref() {
        if provided != expected {
            return Err(AppError::Unauthorized("Invalid API key".to_string()));
        }
    }

    Ok(next.run(request).await)
}
