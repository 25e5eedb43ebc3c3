//! Application configuration.
//!
//! Settings come from a TOML file (every section and field is optional) and
//! are then overridden by environment variables:
//!
//! | Variable | Setting |
//! |---|---|
//! | `HOST`, `PORT` | `server.host`, `server.port` |
//! | `STAR_TRACKER_API_KEY` | `auth.api_key` |
//! | `REPOSITORY_TYPE` | `repository.type` |
//! | `DATABASE_URL` / `PG_DATABASE_URL` | `postgres.database_url` |
//! | `STAR_TRACKER_ENCRYPTION_PROVIDER` | `encryption.provider` |
//! | `STAR_TRACKER_ENCRYPTION_KEY` | `encryption.key` |
//! | `STAR_TRACKER_DEMO_FALLBACK` | `catalog.demo_fallback` |

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::RetryPolicy;
use crate::crypto::{EncryptionProvider, EncryptionSettings};
use crate::db::{PostgresConfig, RepositoryType};

/// File name searched for by [`AppConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "star-tracker.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl ConfigError {
    fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub encryption: EncryptionSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// API key settings. Without a key any non-blank `X-API-Key` is accepted.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub api_key: Option<String>,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

/// `[postgres]` section. Only used when `repository.type` is postgres.
#[derive(Clone, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_pg_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_pg_retry_delay_ms(),
        }
    }
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("database_url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .finish_non_exhaustive()
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_pg_retry_delay_ms() -> u64 {
    100
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_attempts")]
    pub max_attempts: u32,
    #[serde(default)]
    pub retry_delay_ms: u64,
    /// Answer unknown targets with the demo RA/Dec instead of 404.
    #[serde(default)]
    pub demo_fallback: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_catalog_attempts(),
            retry_delay_ms: 0,
            demo_fallback: false,
        }
    }
}

fn default_catalog_attempts() -> u32 {
    crate::catalog::retry::DEFAULT_MAX_ATTEMPTS
}

impl CatalogSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(name, format!("expected a boolean, got '{}'", other))),
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `star-tracker.toml` from the current directory, `backend/`, or the
    /// parent directory, whichever is found first.
    ///
    /// Returns `Ok(None)` if none exists.
    pub fn from_default_location() -> Result<Option<Self>, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Load from `path` (or the default locations), then apply environment
    /// overrides. Falls back to defaults when no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overlay environment variables onto the loaded settings.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = non_blank_env("HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_blank_env("PORT") {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", format!("{}", e)))?;
        }
        if let Some(key) = non_blank_env("STAR_TRACKER_API_KEY") {
            self.auth.api_key = Some(key);
        }
        if let Some(repo_type) = non_blank_env("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Some(url) = non_blank_env("DATABASE_URL").or_else(|| non_blank_env("PG_DATABASE_URL"))
        {
            self.postgres.database_url = url;
        }
        if let Some(provider) = non_blank_env("STAR_TRACKER_ENCRYPTION_PROVIDER") {
            self.encryption.provider = provider
                .parse::<EncryptionProvider>()
                .map_err(|e: String| ConfigError::invalid("STAR_TRACKER_ENCRYPTION_PROVIDER", e))?;
        }
        if let Some(key) = non_blank_env("STAR_TRACKER_ENCRYPTION_KEY") {
            self.encryption.key = Some(key);
        }
        if let Some(flag) = non_blank_env("STAR_TRACKER_DEMO_FALLBACK") {
            self.catalog.demo_fallback = parse_bool("STAR_TRACKER_DEMO_FALLBACK", &flag)?;
        }
        Ok(())
    }

    pub fn repository_type(&self) -> Result<RepositoryType, ConfigError> {
        self.repository
            .repo_type
            .parse()
            .map_err(|e: String| ConfigError::invalid("repository.type", e))
    }

    /// Postgres connection settings, or `None` when no URL is configured.
    pub fn postgres_config(&self) -> Option<PostgresConfig> {
        if self.postgres.database_url.trim().is_empty() {
            return None;
        }
        Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
            max_retries: self.postgres.max_retries,
            retry_delay_ms: self.postgres.retry_delay_ms,
        })
    }

    /// Configured API key, if any non-blank one is set.
    pub fn api_key(&self) -> Option<&str> {
        self.auth
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.catalog.max_attempts, 5);
        assert_eq!(config.catalog.retry_delay_ms, 0);
        assert!(!config.catalog.demo_fallback);
        assert_eq!(config.encryption.provider, EncryptionProvider::AesGcm);
        assert!(config.api_key().is_none());
        assert!(config.postgres_config().is_none());
    }

    #[test]
    fn test_full_file() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [auth]
            api_key = "secret"

            [repository]
            type = "postgres"

            [postgres]
            database_url = "postgres://stars@localhost/stars"
            max_connections = 4

            [encryption]
            provider = "envelope"

            [catalog]
            max_attempts = 3
            retry_delay_ms = 25
            demo_fallback = true
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
        assert_eq!(config.encryption.provider, EncryptionProvider::Envelope);

        let pg = config.postgres_config().unwrap();
        assert_eq!(pg.max_pool_size, 4);
        assert_eq!(pg.min_pool_size, 1);

        let policy = config.catalog.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(25));
        assert!(config.catalog.demo_fallback);
    }

    #[test]
    fn test_unknown_repository_type_is_rejected() {
        let config = AppConfig::from_toml_str("[repository]\ntype = \"dynamodb\"").unwrap();
        assert!(matches!(
            config.repository_type(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_blank_api_key_counts_as_unset() {
        let config = AppConfig::from_toml_str("[auth]\napi_key = \"  \"").unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AppConfig::from_toml_str(
            "[auth]\napi_key = \"hunter2\"\n[postgres]\ndatabase_url = \"postgres://u:pw@h/db\"",
        )
        .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("pw@h"));
    }
}
