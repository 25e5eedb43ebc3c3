//! Star position lookup.
//!
//! Ties the catalog, the equatorial → horizontal transform and the guidance
//! text together into a single [`PositionReport`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{ServiceError, ServiceResult};
use crate::astro::{from_lat_lon, generate_guidance, horizontal_position};
use crate::catalog::{CatalogResolver, StaticCatalog};
use crate::config::CatalogSettings;
use crate::models::{EquatorialCoordinate, GeoCoordinate, HorizontalCoordinate};

/// Inputs for a position lookup.
#[derive(Debug, Clone)]
pub struct PositionRequest {
    pub target: String,
    pub observer: GeoCoordinate,
    /// Evaluation time; `None` means now.
    pub at: Option<DateTime<Utc>>,
}

/// Where the RA/Dec of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    Catalog,
    /// Placeholder coordinates synthesized from the observer location.
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionReport {
    pub requested_target: String,
    pub canonical_name: String,
    pub object_id: Option<String>,
    pub observer: GeoCoordinate,
    pub equatorial: EquatorialCoordinate,
    pub horizontal: HorizontalCoordinate,
    pub guidance: String,
    pub at: DateTime<Utc>,
    pub source: PositionSource,
}

#[derive(Debug, Clone, Default)]
pub struct PositionService {
    resolver: CatalogResolver,
    demo_fallback: bool,
}

impl PositionService {
    pub fn new(resolver: CatalogResolver, demo_fallback: bool) -> Self {
        Self {
            resolver,
            demo_fallback,
        }
    }

    /// Service over the built-in catalog, configured from the `[catalog]` section.
    pub fn from_settings(settings: &CatalogSettings) -> Self {
        let resolver = CatalogResolver::new(
            Arc::new(StaticCatalog::default()),
            settings.retry_policy(),
        );
        Self::new(resolver, settings.demo_fallback)
    }

    pub fn demo_fallback(&self) -> bool {
        self.demo_fallback
    }

    /// Compute where `request.target` is in the observer's sky.
    ///
    /// Unknown targets are a [`ServiceError::NotFound`] unless demo fallback
    /// is enabled, in which case the placeholder mapping supplies the RA/Dec.
    pub async fn locate(
        &self,
        request: PositionRequest,
        cancel: &CancellationToken,
    ) -> ServiceResult<PositionReport> {
        let target = request.target.trim();
        if target.is_empty() {
            return Err(ServiceError::validation("target must not be blank"));
        }
        let at = request.at.unwrap_or_else(Utc::now);
        let observer = request.observer;

        let (canonical_name, object_id, equatorial, source) =
            match self.resolver.resolve(target, cancel).await? {
                Some(entry) => (
                    entry.canonical_name.to_string(),
                    Some(entry.object_id.to_string()),
                    entry.coordinates,
                    PositionSource::Catalog,
                ),
                None if self.demo_fallback => (
                    target.to_string(),
                    None,
                    from_lat_lon(observer.latitude_deg, observer.longitude_deg),
                    PositionSource::Demo,
                ),
                None => {
                    return Err(ServiceError::not_found(format!(
                        "Unknown target '{}'",
                        target
                    )))
                }
            };

        let horizontal = horizontal_position(&observer, &equatorial, at);
        let guidance = generate_guidance(
            horizontal.azimuth_deg,
            horizontal.altitude_deg,
            &canonical_name,
        );

        debug!(
            query = target,
            canonical = %canonical_name,
            source = ?source,
            "Position computed"
        );

        Ok(PositionReport {
            requested_target: request.target,
            canonical_name,
            object_id,
            observer,
            equatorial,
            horizontal,
            guidance,
            at,
            source,
        })
    }
}
