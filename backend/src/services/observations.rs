//! Observation log operations.
//!
//! These functions validate input at the boundary and then delegate to an
//! [`ObservationRepository`]. Coordinates are range checked here so that
//! every stored record holds a valid equatorial position.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};
use crate::db::repository::ObservationRepository;
use crate::models::{EquatorialCoordinate, Observation, ObservationId};

/// Fields supplied by a caller when logging an observation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewObservation {
    pub observed_at: DateTime<Utc>,
    pub right_ascension_degrees: f64,
    pub declination_degrees: f64,
    pub observer: String,
    #[serde(default)]
    pub notes: Option<String>,
}

fn require_non_blank(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Validate and store a new observation of `target`.
pub async fn record_observation(
    repo: &dyn ObservationRepository,
    target: &str,
    request: NewObservation,
) -> ServiceResult<Observation> {
    require_non_blank("target", target)?;
    require_non_blank("observer", &request.observer)?;
    let coordinates =
        EquatorialCoordinate::new(request.right_ascension_degrees, request.declination_degrees)?;

    let observation = Observation {
        id: None,
        target: target.trim().to_string(),
        observed_at: request.observed_at,
        coordinates,
        observer: request.observer.trim().to_string(),
        notes: request.notes.filter(|n| !n.trim().is_empty()),
    };

    Ok(repo.create_observation(observation).await?)
}

/// Fetch one observation, failing with [`ServiceError::NotFound`] if it does not exist.
pub async fn get_observation(
    repo: &dyn ObservationRepository,
    id: ObservationId,
) -> ServiceResult<Observation> {
    repo.get_observation(id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Observation {} not found", id)))
}

/// Observations of `target` within the inclusive `[from, to]` window.
pub async fn list_observations(
    repo: &dyn ObservationRepository,
    target: &str,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> ServiceResult<Vec<Observation>> {
    require_non_blank("target", target)?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ServiceError::validation("'from' must not be after 'to'"));
        }
    }
    Ok(repo.query_observations(target, from, to).await?)
}
