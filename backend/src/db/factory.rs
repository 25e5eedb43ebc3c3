//! Repository factory for dependency injection.
//!
//! Picks and builds the observation store backend from runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::config::PostgresConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{ObservationRepository, RepositoryError, RepositoryResult};
use crate::config::AppConfig;
use crate::crypto::EncryptionPort;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts "postgres", "pg" or "local", case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Factory for observation store instances.
///
/// # Example
/// ```ignore
/// use star_tracker::crypto::NoopEncryption;
/// use star_tracker::db::{RepositoryFactory, RepositoryType};
/// use std::sync::Arc;
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, None, Arc::new(NoopEncryption)).await?;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// `postgres_config` is required for [`RepositoryType::Postgres`].
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
        encryption: Arc<dyn EncryptionPort>,
    ) -> RepositoryResult<Arc<dyn ObservationRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires a database URL",
                        )
                    })?;
                    let pg = Self::create_postgres(config, encryption).await?;
                    Ok(pg as Arc<dyn ObservationRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = (postgres_config, encryption);
                    Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local(encryption)),
        }
    }

    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
        encryption: Arc<dyn EncryptionPort>,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let repo = PostgresRepository::new(config.clone(), encryption)?;
        Ok(Arc::new(repo))
    }

    pub fn create_local(encryption: Arc<dyn EncryptionPort>) -> Arc<dyn ObservationRepository> {
        Arc::new(LocalRepository::with_encryption(encryption))
    }

    /// Create the repository described by the `[repository]` and `[postgres]`
    /// sections of the application config.
    pub async fn from_config(
        config: &AppConfig,
        encryption: Arc<dyn EncryptionPort>,
    ) -> RepositoryResult<Arc<dyn ObservationRepository>> {
        let repo_type = config
            .repository_type()
            .map_err(|e| RepositoryError::configuration(e.to_string()))?;
        let postgres_config = config.postgres_config();
        Self::create(repo_type, postgres_config.as_ref(), encryption).await
    }
}
