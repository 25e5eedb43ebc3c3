//! Astronomy engine.
//!
//! Pure, stateless functions:
//!
//! - [`normalizer`]: decimal-degree string parsing with hemisphere suffixes
//! - [`mapper`]: demo RA/Dec synthesis and the equatorial → horizontal transform
//! - [`guidance`]: human-readable pointing directions
//!
//! Nothing here allocates shared state or fails on well-formed numeric input,
//! so these functions can be called from any number of request tasks at once.

pub mod guidance;
pub mod mapper;
pub mod normalizer;

pub use guidance::generate_guidance;
pub use mapper::{compute_az_alt, from_lat_lon, horizontal_position};
pub use normalizer::parse_decimal_degrees;

/// Magnitude above which an `f64` has no fractional digits left to round.
const ROUNDING_LIMIT: f64 = 1e16;

/// Round to `decimals` places, halves away from zero.
///
/// Values at or beyond [`ROUNDING_LIMIT`], or whose scaled form would
/// overflow, are returned unchanged so finite input stays finite.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if value.abs() >= ROUNDING_LIMIT || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn test_round_to_five_places() {
        assert_eq!(round_to(37.70443321, 5), 37.70443);
        assert_eq!(round_to(37.704436, 5), 37.70444);
        assert_eq!(round_to(-77.418324, 5), -77.41832);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_huge_values_pass_through() {
        assert_eq!(round_to(1e16, 5), 1e16);
        assert_eq!(round_to(-1e304, 5), -1e304);
        assert_eq!(round_to(f64::MAX, 5), f64::MAX);
        assert!(round_to(1e304, 5).is_finite());
    }
}
