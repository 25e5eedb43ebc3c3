//! In-memory observation store.
//!
//! Used for local development and tests. Records are kept exactly as a
//! persistent backend would keep them: the coordinate pair lives only in the
//! encrypted payload, so tests can check what actually sits "on disk".

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::crypto::{EncryptionPort, NoopEncryption};
use crate::db::payload::LocationPayload;
use crate::db::repository::{
    ErrorContext, ObservationRepository, RepositoryError, RepositoryResult,
};
use crate::models::{target_key, Observation, ObservationId};

#[derive(Debug, Clone)]
struct StoredRecord {
    id: ObservationId,
    /// Insertion order, breaks ties between equal timestamps.
    seq: u64,
    target: String,
    target_key: String,
    observed_at: DateTime<Utc>,
    observer: String,
    notes: Option<String>,
    encrypted_location_payload: String,
}

pub struct LocalRepository {
    records: RwLock<HashMap<ObservationId, StoredRecord>>,
    encryption: Arc<dyn EncryptionPort>,
    next_seq: AtomicU64,
    healthy: AtomicBool,
}

impl std::fmt::Debug for LocalRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRepository")
            .field("observations", &self.observation_count())
            .field("encryption", &self.encryption.name())
            .finish()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Store without encryption.
    pub fn new() -> Self {
        Self::with_encryption(Arc::new(NoopEncryption))
    }

    pub fn with_encryption(encryption: Arc<dyn EncryptionPort>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            encryption,
            next_seq: AtomicU64::new(0),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn observation_count(&self) -> usize {
        self.records.read().len()
    }

    /// Stored (protected) payloads, in no particular order.
    pub fn raw_location_payloads(&self) -> Vec<String> {
        self.records
            .read()
            .values()
            .map(|r| r.encrypted_location_payload.clone())
            .collect()
    }

    /// Simulate an outage for health-check tests.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }

    fn decode(&self, record: StoredRecord) -> RepositoryResult<Observation> {
        let payload =
            LocationPayload::unprotect(&record.encrypted_location_payload, &*self.encryption)
                .map_err(|e| e.with_operation("decode_observation"))?;
        Ok(Observation {
            id: Some(record.id),
            target: record.target,
            observed_at: record.observed_at,
            coordinates: payload.into(),
            observer: record.observer,
            notes: record.notes,
        })
    }
}

#[async_trait]
impl ObservationRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    async fn create_observation(&self, observation: Observation) -> RepositoryResult<Observation> {
        self.ensure_healthy("create_observation")?;

        let id = observation.id.unwrap_or_else(ObservationId::generate);
        let encrypted_location_payload =
            LocationPayload::from(observation.coordinates).protect(&*self.encryption)?;

        let record = StoredRecord {
            id,
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            target: observation.target.clone(),
            target_key: observation.target_key(),
            observed_at: observation.observed_at,
            observer: observation.observer.clone(),
            notes: observation.notes.clone(),
            encrypted_location_payload,
        };

        {
            let mut records = self.records.write();
            if records.contains_key(&id) {
                return Err(RepositoryError::validation_with_context(
                    "Observation already exists",
                    ErrorContext::new("create_observation")
                        .with_entity("observation")
                        .with_entity_id(id),
                ));
            }
            records.insert(id, record);
        }

        debug!(id = %id, star = %observation.target, "Stored observation");
        Ok(Observation {
            id: Some(id),
            ..observation
        })
    }

    async fn get_observation(&self, id: ObservationId) -> RepositoryResult<Option<Observation>> {
        self.ensure_healthy("get_observation")?;

        let record = self.records.read().get(&id).cloned();
        record.map(|r| self.decode(r)).transpose()
    }

    async fn query_observations(
        &self,
        target: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<Observation>> {
        self.ensure_healthy("query_observations")?;

        let key = target_key(target);
        let mut matches: Vec<StoredRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.target_key == key)
            .filter(|r| from.map_or(true, |f| r.observed_at >= f))
            .filter(|r| to.map_or(true, |t| r.observed_at <= t))
            .cloned()
            .collect();

        matches.sort_by_key(|r| (r.observed_at, r.seq));
        matches.into_iter().map(|r| self.decode(r)).collect()
    }
}
