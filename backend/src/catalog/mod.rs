//! Star catalog and target name resolution.
//!
//! [`CatalogResolver`] normalizes a free-text target and asks a
//! [`CatalogBackend`] for a match, retrying transient failures through
//! [`retry::retry_bounded`]. The only backend shipped is [`StaticCatalog`], a
//! fixed table of ten bright stars.

pub mod entries;
pub mod error;
pub mod resolver;
pub mod retry;

pub use entries::BRIGHT_STARS;
pub use error::{CatalogBackendError, CatalogError};
pub use resolver::{CatalogBackend, CatalogResolver, StaticCatalog};
pub use retry::{retry_bounded, RetryError, RetryPolicy, Retryable};
