//! Observation storage.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / services::observations                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ObservationRepository trait (repository/)              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │                              │
//! ┌───▼──────────────┐   ┌───────────▼──────────────┐
//! │ LocalRepository  │   │ PostgresRepository       │
//! │ (in-memory)      │   │ (Diesel, postgres-repo)  │
//! └──────────────────┘   └──────────────────────────┘
//! ```
//!
//! Both backends store the coordinate pair as a [`LocationPayload`] protected
//! by the configured [`EncryptionPort`](crate::crypto::EncryptionPort).

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod payload;
pub mod repositories;
pub mod repository;

pub use config::PostgresConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use payload::LocationPayload;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ErrorContext, ObservationRepository, RepositoryError, RepositoryResult,
};
