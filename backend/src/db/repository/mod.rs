//! Observation store abstraction.

pub mod error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{Observation, ObservationId};

/// Append-only observation log.
///
/// Implementations encrypt the coordinate pair of each record at rest and
/// must be `Send + Sync` so a single instance can serve concurrent requests.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Persist an observation.
    ///
    /// A fresh [`ObservationId`] is assigned when `observation.id` is `None`.
    /// Returns the stored observation with its id set.
    async fn create_observation(&self, observation: Observation) -> RepositoryResult<Observation>;

    async fn get_observation(&self, id: ObservationId) -> RepositoryResult<Option<Observation>>;

    /// Observations for `target` (case-insensitive) with `from <= observed_at <= to`,
    /// ordered by `observed_at` ascending. Missing bounds are open.
    async fn query_observations(
        &self,
        target: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<Observation>>;
}
