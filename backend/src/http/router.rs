//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! API key check), and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_api_key;
use super::handlers;
use super::state::AppState;

/// Observation bodies are a handful of fields.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/stars/{target}/position", get(handlers::get_position))
        .route(
            "/stars/{target}/observations",
            get(handlers::list_observations).post(handlers::create_observation),
        )
        .route("/observations/{id}", get(handlers::get_observation))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .nest("/api/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
