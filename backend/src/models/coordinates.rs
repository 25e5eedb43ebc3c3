//! Coordinate value types shared by the astronomy engine and the observation log.
//!
//! All angles are decimal degrees. The validating constructors enforce the
//! documented ranges; the astronomy mapper builds unchecked values for its
//! demo synthesis, which is allowed to wander outside them.

use serde::{Deserialize, Serialize};

/// Error returned when a coordinate value falls outside its valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be in [{min}, {max}), got {value}")]
    OutOfHalfOpenRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

fn check_closed(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), CoordinateError> {
    if !value.is_finite() {
        return Err(CoordinateError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(CoordinateError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_half_open(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), CoordinateError> {
    if !value.is_finite() {
        return Err(CoordinateError::NotFinite { field });
    }
    if value < min || value >= max {
        return Err(CoordinateError::OutOfHalfOpenRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Observer position on Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude in degrees (north positive), range [-90, 90]
    pub latitude_deg: f64,
    /// Longitude in degrees (east positive), range [-180, 180]
    pub longitude_deg: f64,
}

impl GeoCoordinate {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, CoordinateError> {
        check_closed("lat", latitude_deg, -90.0, 90.0)?;
        check_closed("lon", longitude_deg, -180.0, 180.0)?;
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }
}

/// Position on the celestial sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    /// Right ascension in degrees, range [0, 360)
    pub right_ascension_deg: f64,
    /// Declination in degrees, range [-90, 90]
    pub declination_deg: f64,
}

impl EquatorialCoordinate {
    pub fn new(right_ascension_deg: f64, declination_deg: f64) -> Result<Self, CoordinateError> {
        check_half_open("right_ascension_degrees", right_ascension_deg, 0.0, 360.0)?;
        check_closed("declination_degrees", declination_deg, -90.0, 90.0)?;
        Ok(Self {
            right_ascension_deg,
            declination_deg,
        })
    }

    /// Build without range checks. Used for static catalog data and the demo mapping.
    pub const fn new_unchecked(right_ascension_deg: f64, declination_deg: f64) -> Self {
        Self {
            right_ascension_deg,
            declination_deg,
        }
    }
}

/// Position in the observer's local sky. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinate {
    /// Azimuth in degrees, range [0, 360)
    pub azimuth_deg: f64,
    /// Altitude above the horizon in degrees, range [-90, 90]
    pub altitude_deg: f64,
}
