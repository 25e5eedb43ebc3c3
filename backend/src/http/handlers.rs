//! HTTP handlers for the REST API.
//!
//! Each handler parses and checks its inputs, then delegates to the service
//! layer.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};

use super::dto::{
    CreateObservationRequest, HealthResponse, ObservationListResponse, ObservationResponse,
    ObservationWindowQuery, PositionQuery, PositionResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::astro::parse_decimal_degrees;
use crate::models::{GeoCoordinate, ObservationId};
use crate::services::{self, PositionRequest, ServiceError};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Parse a decimal-degree query parameter, accepting hemisphere suffixes.
fn parse_degrees(name: &str, raw: Option<&str>) -> Result<f64, AppError> {
    let raw = raw
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing query parameter '{}'", name)))?;
    parse_decimal_degrees(Some(raw))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {}: '{}'", name, raw)))
}

fn parse_timestamp(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                AppError::BadRequest(format!("Invalid {}: '{}' is not RFC 3339 ({})", name, value, e))
            }),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /api/v1/health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let (status, database) = match state.repository.health_check().await {
        Ok(true) => ("healthy", "connected".to_string()),
        Ok(false) => ("degraded", "disconnected".to_string()),
        Err(e) => ("degraded", format!("error: {}", e)),
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        database,
    }))
}

// =============================================================================
// Star Positions
// =============================================================================

/// GET /api/v1/stars/{target}/position?lat=&lon=&at=
pub async fn get_position(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Query(query): Query<PositionQuery>,
) -> HandlerResult<PositionResponse> {
    let lat = parse_degrees("lat", query.lat.as_deref())?;
    let lon = parse_degrees("lon", query.lon.as_deref())?;
    let observer = GeoCoordinate::new(lat, lon).map_err(ServiceError::from)?;
    let at = parse_timestamp("at", query.at.as_deref())?;

    let report = state
        .positions
        .locate(
            PositionRequest {
                target,
                observer,
                at,
            },
            &state.request_token(),
        )
        .await?;

    Ok(Json(report.into()))
}

// =============================================================================
// Observation Log
// =============================================================================

/// POST /api/v1/stars/{target}/observations
///
/// Returns 201 with a `Location` header pointing at the new record.
pub async fn create_observation(
    State(state): State<AppState>,
    Path(target): Path<String>,
    body: Result<Json<CreateObservationRequest>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<ObservationResponse>), AppError> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let stored =
        services::record_observation(state.repository.as_ref(), &target, request).await?;
    let response = ObservationResponse::from(stored);
    let location = format!("/api/v1/observations/{}", response.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

/// GET /api/v1/stars/{target}/observations?from=&to=
pub async fn list_observations(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Query(query): Query<ObservationWindowQuery>,
) -> HandlerResult<ObservationListResponse> {
    let from = parse_timestamp("from", query.from.as_deref())?;
    let to = parse_timestamp("to", query.to.as_deref())?;

    let observations =
        services::list_observations(state.repository.as_ref(), &target, from, to).await?;
    let observations: Vec<ObservationResponse> =
        observations.into_iter().map(Into::into).collect();
    let total = observations.len();

    Ok(Json(ObservationListResponse {
        target,
        observations,
        total,
    }))
}

/// GET /api/v1/observations/{id}
pub async fn get_observation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<ObservationResponse> {
    let id: ObservationId = id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid observation id '{}'", id)))?;

    let observation = services::get_observation(state.repository.as_ref(), id).await?;
    Ok(Json(observation.into()))
}
