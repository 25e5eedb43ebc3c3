//! Postgres observation store using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! Blocking Diesel calls run on tokio's blocking pool. The coordinate pair is
//! encrypted before it reaches the connection and decrypted after rows are
//! loaded, so the database only ever sees the protected payload.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::task;
use tracing::{debug, info};

use crate::crypto::EncryptionPort;
use crate::db::config::PostgresConfig;
use crate::db::payload::LocationPayload;
use crate::db::repository::{
    ErrorContext, ObservationRepository, RepositoryError, RepositoryResult,
};
use crate::models::{target_key, Observation, ObservationId};

mod models;
mod schema;

use models::{NewObservationRow, ObservationRow};
use schema::observations;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Diesel-backed observation store.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    encryption: Arc<dyn EncryptionPort>,
}

impl std::fmt::Debug for PostgresRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRepository")
            .field("config", &self.config)
            .field("encryption", &self.encryption.name())
            .finish()
    }
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(
        config: PostgresConfig,
        encryption: Arc<dyn EncryptionPort>,
    ) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(
            max_pool_size = config.max_pool_size,
            encryption = encryption.name(),
            "Postgres observation store ready"
        );

        Ok(Self {
            pool,
            config,
            encryption,
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        Ok(())
    }

    /// Run `f` on a pooled connection, retrying retryable failures with
    /// exponential backoff up to `max_retries` times.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: Fn(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;

            loop {
                let result = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        )
                    })
                    .and_then(|mut conn| f(&mut conn));

                match result {
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        attempt += 1;
                        debug!(operation, attempt, error = %e, "Retrying database operation");
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                    }
                    other => return other.map_err(|e| e.with_operation(operation)),
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    fn decode(&self, row: ObservationRow) -> RepositoryResult<Observation> {
        let payload = LocationPayload::unprotect(&row.encrypted_location_payload, &*self.encryption)
            .map_err(|e| e.with_operation("decode_observation"))?;
        Ok(Observation {
            id: Some(ObservationId::new(row.id)),
            target: row.target,
            observed_at: row.observed_at,
            coordinates: payload.into(),
            observer: row.observer,
            notes: row.notes,
        })
    }
}

#[async_trait]
impl ObservationRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn create_observation(&self, observation: Observation) -> RepositoryResult<Observation> {
        let id = observation.id.unwrap_or_else(ObservationId::generate);
        let row = NewObservationRow {
            id: id.value(),
            target: observation.target.clone(),
            target_key: observation.target_key(),
            observed_at: observation.observed_at,
            observer: observation.observer.clone(),
            notes: observation.notes.clone(),
            encrypted_location_payload: LocationPayload::from(observation.coordinates)
                .protect(&*self.encryption)?,
        };

        self.with_conn("create_observation", move |conn| {
            diesel::insert_into(observations::table)
                .values(&row)
                .execute(conn)
                .map(|_| ())
                .map_err(RepositoryError::from)
        })
        .await?;

        debug!(id = %id, "Stored observation");
        Ok(Observation {
            id: Some(id),
            ..observation
        })
    }

    async fn get_observation(&self, id: ObservationId) -> RepositoryResult<Option<Observation>> {
        let row = self
            .with_conn("get_observation", move |conn| {
                observations::table
                    .find(id.value())
                    .select(ObservationRow::as_select())
                    .first::<ObservationRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;

        row.map(|r| self.decode(r)).transpose()
    }

    async fn query_observations(
        &self,
        target: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<Observation>> {
        let key = target_key(target);

        let rows = self
            .with_conn("query_observations", move |conn| {
                let mut query = observations::table
                    .filter(observations::target_key.eq(&key))
                    .into_boxed();
                if let Some(from) = from {
                    query = query.filter(observations::observed_at.ge(from));
                }
                if let Some(to) = to {
                    query = query.filter(observations::observed_at.le(to));
                }
                query
                    .order((observations::observed_at.asc(), observations::created_at.asc()))
                    .select(ObservationRow::as_select())
                    .load::<ObservationRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;

        rows.into_iter().map(|r| self.decode(r)).collect()
    }
}
