//! Target name resolution against a catalog backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::entries::BRIGHT_STARS;
use super::error::{CatalogBackendError, CatalogError};
use super::retry::{retry_bounded, RetryPolicy};
use crate::models::{target_key, CatalogEntry};

/// Source of catalog entries.
///
/// `lookup` receives an already-normalized target (trimmed, lowercase) and
/// returns `Ok(None)` when nothing matches.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn lookup(
        &self,
        normalized_target: &str,
    ) -> Result<Option<CatalogEntry>, CatalogBackendError>;
}

/// In-process catalog over a fixed entry table. Never fails.
#[derive(Debug, Clone, Copy)]
pub struct StaticCatalog {
    entries: &'static [CatalogEntry],
}

impl StaticCatalog {
    pub fn new(entries: &'static [CatalogEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    /// Synchronous lookup used by the async backend impl.
    pub fn find(&self, normalized_target: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| e.matches(normalized_target))
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(&BRIGHT_STARS)
    }
}

#[async_trait]
impl CatalogBackend for StaticCatalog {
    async fn lookup(
        &self,
        normalized_target: &str,
    ) -> Result<Option<CatalogEntry>, CatalogBackendError> {
        Ok(self.find(normalized_target).cloned())
    }
}

/// Resolves free-text target names to catalog entries with bounded retry.
#[derive(Clone)]
pub struct CatalogResolver {
    backend: Arc<dyn CatalogBackend>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for CatalogResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogResolver")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for CatalogResolver {
    fn default() -> Self {
        Self::new(Arc::new(StaticCatalog::default()), RetryPolicy::default())
    }
}

impl CatalogResolver {
    pub fn new(backend: Arc<dyn CatalogBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Resolve `target` by canonical name, object id or alias, case-insensitively.
    ///
    /// Blank targets resolve to `Ok(None)` without touching the backend.
    /// Transient backend failures are retried up to the policy cap and then
    /// reported as [`CatalogError::Unavailable`].
    pub async fn resolve(
        &self,
        target: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<CatalogEntry>, CatalogError> {
        let key = target_key(target);
        if key.is_empty() {
            return Ok(None);
        }

        let backend = self.backend.as_ref();
        let key_ref = key.as_str();
        let entry = retry_bounded(&self.policy, cancel, move |_| backend.lookup(key_ref)).await?;

        debug!(query = %key, found = entry.is_some(), "Catalog lookup finished");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails transiently a fixed number of times, then delegates to the static table.
    struct FlakyCatalog {
        failures: u32,
        calls: AtomicU32,
        terminal: bool,
    }

    impl FlakyCatalog {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                terminal: false,
            }
        }
    }

    #[async_trait]
    impl CatalogBackend for FlakyCatalog {
        async fn lookup(
            &self,
            normalized_target: &str,
        ) -> Result<Option<CatalogEntry>, CatalogBackendError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.terminal {
                return Err(CatalogBackendError::Backend("index corrupted".into()));
            }
            if call <= self.failures {
                return Err(CatalogBackendError::Transient(format!("timeout #{call}")));
            }
            StaticCatalog::default().lookup(normalized_target).await
        }
    }

    async fn resolve_name(target: &str) -> Option<&'static str> {
        CatalogResolver::default()
            .resolve(target, &CancellationToken::new())
            .await
            .unwrap()
            .map(|e| e.canonical_name)
    }

    #[tokio::test]
    async fn test_aliases_resolve_to_same_entry() {
        assert_eq!(resolve_name("alpha UMi").await, Some("Polaris"));
        assert_eq!(resolve_name("North Star").await, Some("Polaris"));
        assert_eq!(resolve_name("HIP 11767").await, Some("Polaris"));
        assert_eq!(resolve_name("  polaris ").await, Some("Polaris"));
        assert_eq!(resolve_name("DOG STAR").await, Some("Sirius"));
        assert_eq!(resolve_name("Alpha Centauri").await, Some("Rigil Kentaurus"));
    }

    #[tokio::test]
    async fn test_unknown_and_blank_targets_are_not_found() {
        assert_eq!(resolve_name("UnknownStarXYZ").await, None);
        assert_eq!(resolve_name("").await, None);
        assert_eq!(resolve_name("   ").await, None);
    }

    #[tokio::test]
    async fn test_transient_failures_below_cap_recover() {
        let backend = Arc::new(FlakyCatalog::new(4));
        let resolver = CatalogResolver::new(backend.clone(), RetryPolicy::default());

        let entry = resolver
            .resolve("Vega", &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(entry.canonical_name, "Vega");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_transient_failures_at_cap_are_unavailable() {
        let backend = Arc::new(FlakyCatalog::new(5));
        let resolver = CatalogResolver::new(backend.clone(), RetryPolicy::default());

        let err = resolver
            .resolve("Vega", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Unavailable { attempts: 5, .. }));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_terminal_failure_is_not_retried() {
        let backend = Arc::new(FlakyCatalog {
            terminal: true,
            ..FlakyCatalog::new(0)
        });
        let resolver = CatalogResolver::new(backend.clone(), RetryPolicy::default());

        let err = resolver
            .resolve("Vega", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Backend(_)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_lookup() {
        let backend = Arc::new(FlakyCatalog::new(0));
        let resolver = CatalogResolver::new(backend.clone(), RetryPolicy::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolver.resolve("Vega", &cancel).await.unwrap_err();

        assert_eq!(err, CatalogError::Cancelled);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_static_catalog_find() {
        let catalog = StaticCatalog::default();
        assert_eq!(catalog.entries().len(), 10);
        assert_eq!(
            catalog.find("alpha lyr").map(|e| e.object_id),
            Some("HIP 91262")
        );
        assert!(catalog.find("Alpha Lyr").is_none(), "find expects normalized input");
    }
}
