//! Observation log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coordinates::EquatorialCoordinate;
use crate::define_id_type;

define_id_type!(uuid::Uuid, ObservationId);

impl ObservationId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

/// A single logged observation.
///
/// The `id` is `None` until the record has been created by an
/// [`ObservationRepository`](crate::db::repository::ObservationRepository).
/// Records are append-only; only the coordinate pair is encrypted at rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: Option<ObservationId>,
    pub target: String,
    pub observed_at: DateTime<Utc>,
    pub coordinates: EquatorialCoordinate,
    pub observer: String,
    pub notes: Option<String>,
}

impl Observation {
    /// Case-insensitive key used to match observations by target.
    pub fn target_key(&self) -> String {
        target_key(&self.target)
    }
}

/// Normalize a target name for lookups (trimmed, lowercase).
pub fn target_key(target: &str) -> String {
    target.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_id_display_roundtrip() {
        let id = ObservationId::generate();
        let parsed: ObservationId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_observation_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<ObservationId>().is_err());
    }

    #[test]
    fn test_observation_id_serializes_as_plain_string() {
        let id = ObservationId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_target_key_normalizes() {
        assert_eq!(target_key("  Sirius "), "sirius");
        assert_eq!(target_key("NORTH Star"), "north star");
    }
}
