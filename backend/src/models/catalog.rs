use serde::Serialize;

use super::coordinates::EquatorialCoordinate;
use super::observation::target_key;

/// A fixed star catalog entry.
///
/// The canonical name and object id always match in addition to the aliases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub object_id: &'static str,
    pub canonical_name: &'static str,
    pub coordinates: EquatorialCoordinate,
    pub aliases: &'static [&'static str],
}

impl CatalogEntry {
    /// Check whether an already-normalized target (trimmed, lowercase) names this entry.
    pub fn matches(&self, normalized_target: &str) -> bool {
        target_key(self.canonical_name) == normalized_target
            || target_key(self.object_id) == normalized_target
            || self
                .aliases
                .iter()
                .any(|alias| target_key(alias) == normalized_target)
    }
}
