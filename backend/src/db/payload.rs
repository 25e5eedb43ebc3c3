//! The encrypted part of a stored observation.

use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::crypto::EncryptionPort;
use crate::models::EquatorialCoordinate;

/// Coordinate pair serialized to JSON and protected before storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub right_ascension_degrees: f64,
    pub declination_degrees: f64,
}

impl From<EquatorialCoordinate> for LocationPayload {
    fn from(c: EquatorialCoordinate) -> Self {
        Self {
            right_ascension_degrees: c.right_ascension_deg,
            declination_degrees: c.declination_deg,
        }
    }
}

impl From<LocationPayload> for EquatorialCoordinate {
    fn from(p: LocationPayload) -> Self {
        // Values were range checked before they were stored.
        EquatorialCoordinate::new_unchecked(p.right_ascension_degrees, p.declination_degrees)
    }
}

impl LocationPayload {
    /// Serialize and encrypt.
    pub fn protect(&self, encryption: &dyn EncryptionPort) -> RepositoryResult<String> {
        let json = serde_json::to_string(self).map_err(|e| {
            RepositoryError::internal_with_context(
                e.to_string(),
                ErrorContext::new("serialize_location_payload"),
            )
        })?;
        Ok(encryption.protect(&json)?)
    }

    /// Decrypt and deserialize.
    pub fn unprotect(protected: &str, encryption: &dyn EncryptionPort) -> RepositoryResult<Self> {
        let json = encryption.unprotect(protected)?;
        serde_json::from_str(&json).map_err(|e| {
            RepositoryError::internal_with_context(
                e.to_string(),
                ErrorContext::new("deserialize_location_payload"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{AesGcmEncryption, NoopEncryption};

    #[test]
    fn test_plain_json_shape() {
        let payload = LocationPayload::from(EquatorialCoordinate::new(80.0, 38.78).unwrap());
        let json = payload.protect(&NoopEncryption).unwrap();
        assert_eq!(
            json,
            r#"{"right_ascension_degrees":80.0,"declination_degrees":38.78}"#
        );
    }

    #[test]
    fn test_encrypted_roundtrip() {
        let port = AesGcmEncryption::generate();
        let payload = LocationPayload {
            right_ascension_degrees: 80.0,
            declination_degrees: 38.78,
        };
        let protected = payload.protect(&port).unwrap();
        assert!(!protected.contains("38.78"));
        assert_eq!(LocationPayload::unprotect(&protected, &port).unwrap(), payload);
    }

    #[test]
    fn test_garbage_payload_is_internal_error() {
        let err = LocationPayload::unprotect("[1,2]", &NoopEncryption).unwrap_err();
        assert!(matches!(err, RepositoryError::InternalError { .. }));
    }
}
