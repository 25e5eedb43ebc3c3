//! Data Transfer Objects for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::services::NewObservation as CreateObservationRequest;
use crate::models::Observation;
use crate::services::{PositionReport, PositionSource};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// "connected", "disconnected" or an error description
    pub database: String,
}

/// Query string of `GET /stars/{target}/position`.
///
/// Values stay raw strings so parse failures can name the parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// RFC 3339 timestamp; defaults to now
    pub at: Option<String>,
}

/// Query string of `GET /stars/{target}/observations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservationWindowQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    pub target: String,
    pub canonical_name: String,
    pub object_id: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub right_ascension_degrees: f64,
    pub declination_degrees: f64,
    pub azimuth_degrees: f64,
    pub altitude_degrees: f64,
    pub guidance: String,
    pub at: DateTime<Utc>,
    /// "catalog" or "demo"
    pub source: String,
}

impl From<PositionReport> for PositionResponse {
    fn from(report: PositionReport) -> Self {
        let source = match report.source {
            PositionSource::Catalog => "catalog",
            PositionSource::Demo => "demo",
        };
        Self {
            target: report.requested_target,
            canonical_name: report.canonical_name,
            object_id: report.object_id,
            latitude: report.observer.latitude_deg,
            longitude: report.observer.longitude_deg,
            right_ascension_degrees: report.equatorial.right_ascension_deg,
            declination_degrees: report.equatorial.declination_deg,
            azimuth_degrees: report.horizontal.azimuth_deg,
            altitude_degrees: report.horizontal.altitude_deg,
            guidance: report.guidance,
            at: report.at,
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationResponse {
    pub id: String,
    pub target: String,
    pub observed_at: DateTime<Utc>,
    pub right_ascension_degrees: f64,
    pub declination_degrees: f64,
    pub observer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<Observation> for ObservationResponse {
    fn from(observation: Observation) -> Self {
        Self {
            id: observation.id.map(|id| id.to_string()).unwrap_or_default(),
            target: observation.target,
            observed_at: observation.observed_at,
            right_ascension_degrees: observation.coordinates.right_ascension_deg,
            declination_degrees: observation.coordinates.declination_deg,
            observer: observation.observer,
            notes: observation.notes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationListResponse {
    pub target: String,
    pub observations: Vec<ObservationResponse>,
    pub total: usize,
}
