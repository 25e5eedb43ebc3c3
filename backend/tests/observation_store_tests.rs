//! Observation log round trips through every encryption provider.

mod support;

use std::sync::Arc;

use star_tracker::crypto::{
    build_encryption, AesGcmEncryption, EncryptionPort, EncryptionProvider, EncryptionSettings,
    EnvelopeEncryption, NoopEncryption,
};
use star_tracker::db::{LocalRepository, ObservationRepository, RepositoryFactory, RepositoryType};
use star_tracker::services::{self, NewObservation, ServiceError};
use support::reference_time;

fn capella_sighting() -> NewObservation {
    NewObservation {
        observed_at: reference_time(),
        right_ascension_degrees: 80.0,
        declination_degrees: 38.78,
        observer: "backyard".to_string(),
        notes: Some("clear sky".to_string()),
    }
}

fn providers() -> Vec<Arc<dyn EncryptionPort>> {
    vec![
        Arc::new(NoopEncryption) as Arc<dyn EncryptionPort>,
        Arc::new(AesGcmEncryption::generate()) as Arc<dyn EncryptionPort>,
        Arc::new(EnvelopeEncryption::generate()) as Arc<dyn EncryptionPort>,
    ]
}

#[tokio::test]
async fn test_round_trip_with_every_provider() {
    for encryption in providers() {
        let name = encryption.name();
        let repo = RepositoryFactory::create(RepositoryType::Local, None, encryption)
            .await
            .unwrap();

        let stored = services::record_observation(repo.as_ref(), "Capella", capella_sighting())
            .await
            .unwrap();
        let fetched = services::get_observation(repo.as_ref(), stored.id.unwrap())
            .await
            .unwrap();

        assert_eq!(fetched.coordinates.right_ascension_deg, 80.0, "{}", name);
        assert_eq!(fetched.coordinates.declination_deg, 38.78, "{}", name);
        assert_eq!(fetched.notes.as_deref(), Some("clear sky"));
        assert_eq!(fetched, stored);
    }
}

#[tokio::test]
async fn test_encrypted_payload_hides_coordinates() {
    for encryption in providers().into_iter().skip(1) {
        let repo = LocalRepository::with_encryption(encryption);
        services::record_observation(&repo, "Capella", capella_sighting())
            .await
            .unwrap();

        let payloads = repo.raw_location_payloads();
        assert_eq!(payloads.len(), 1);
        assert!(!payloads[0].contains("38.78"));
        assert!(!payloads[0].contains("right_ascension"));
    }
}

#[tokio::test]
async fn test_noop_payload_is_plain_json() {
    let repo = LocalRepository::new();
    services::record_observation(&repo, "Capella", capella_sighting())
        .await
        .unwrap();

    let payload: serde_json::Value =
        serde_json::from_str(&repo.raw_location_payloads()[0]).unwrap();
    assert_eq!(payload["right_ascension_degrees"], 80.0);
    assert_eq!(payload["declination_degrees"], 38.78);
}

#[tokio::test]
async fn test_configured_key_reads_back_across_instances() {
    use base64::Engine;

    let key = base64::engine::general_purpose::STANDARD.encode([7u8; 32]);
    for provider in [EncryptionProvider::AesGcm, EncryptionProvider::Envelope] {
        let settings = EncryptionSettings {
            provider,
            key: Some(key.clone()),
        };
        let writer = build_encryption(&settings).unwrap();
        let reader = build_encryption(&settings).unwrap();

        let protected = writer.protect("{\"x\":1}").unwrap();
        assert_eq!(reader.unprotect(&protected).unwrap(), "{\"x\":1}");
    }
}

#[tokio::test]
async fn test_query_orders_by_observed_at() {
    let repo = LocalRepository::with_encryption(Arc::new(AesGcmEncryption::generate()));
    for minutes in [30, 5, 15] {
        let mut sighting = capella_sighting();
        sighting.observed_at = reference_time() + chrono::Duration::minutes(minutes);
        services::record_observation(&repo, "Capella", sighting)
            .await
            .unwrap();
    }

    let listed = services::list_observations(&repo, "capella", None, None)
        .await
        .unwrap();
    let offsets: Vec<i64> = listed
        .iter()
        .map(|o| (o.observed_at - reference_time()).num_minutes())
        .collect();
    assert_eq!(offsets, vec![5, 15, 30]);
}

#[tokio::test]
async fn test_unhealthy_store_surfaces_repository_error() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    assert!(!repo.health_check().await.unwrap());
    let err = services::record_observation(&repo, "Capella", capella_sighting())
        .await
        .unwrap_err();
    match err {
        ServiceError::Repository(e) => assert!(e.is_retryable()),
        other => panic!("unexpected error: {:?}", other),
    }
}
