//! Equatorial → horizontal coordinate transform.
//!
//! The transform goes through the usual chain:
//!
//! ```text
//! UTC ─► Julian Date ─► GMST ─► LST (+ observer longitude) ─► Hour Angle
//!                                                                  │
//!            (RA, Dec, observer latitude) ─────────────────────────┴─► (Az, Alt)
//! ```
//!
//! No precession, nutation or refraction is applied.

use chrono::{DateTime, Utc};

use super::round_to;
use crate::models::{EquatorialCoordinate, GeoCoordinate, HorizontalCoordinate, JulianDate};

/// GMST at the J2000.0 epoch, in degrees.
const GMST_AT_J2000_DEG: f64 = 280.46061837;
/// Sidereal rotation per solar day, in degrees.
const SIDEREAL_DEG_PER_DAY: f64 = 360.98564736629;

const OUTPUT_DECIMALS: i32 = 5;

/// Map an observer position to a placeholder RA/Dec.
///
/// `ra = (lon + 360) % 360`, `dec = lat`. This is a legacy demo mapping with
/// no astronomical meaning; keep it byte-for-byte compatible, including the
/// negative remainder for longitudes below -360.
pub fn from_lat_lon(lat: f64, lon: f64) -> EquatorialCoordinate {
    EquatorialCoordinate::new_unchecked((lon + 360.0) % 360.0, lat)
}

/// Greenwich Mean Sidereal Time in degrees, reduced to [0, 360).
pub fn greenwich_mean_sidereal_time(jd: JulianDate) -> f64 {
    let gmst = GMST_AT_J2000_DEG + SIDEREAL_DEG_PER_DAY * jd.days_since_j2000();
    ((gmst % 360.0) + 360.0) % 360.0
}

/// Local Sidereal Time in degrees for an east-positive longitude.
pub fn local_sidereal_time(gmst_deg: f64, observer_lon_deg: f64) -> f64 {
    let lst = (gmst_deg + observer_lon_deg) % 360.0;
    if lst < 0.0 {
        lst + 360.0
    } else {
        lst
    }
}

/// Hour angle in degrees, folded into (-180, 180].
pub fn hour_angle(lst_deg: f64, ra_deg: f64) -> f64 {
    let ha = (lst_deg - ra_deg + 360.0) % 360.0;
    if ha > 180.0 {
        ha - 360.0
    } else {
        ha
    }
}

/// Compute azimuth and altitude (degrees, 5 decimals) of a target at `at_utc`.
///
/// Total for all finite inputs: `sin(alt)` is clamped before `asin`, the
/// azimuth is reduced to [0, 360).
pub fn compute_az_alt(
    observer_lat_deg: f64,
    observer_lon_deg: f64,
    right_ascension_deg: f64,
    declination_deg: f64,
    at_utc: DateTime<Utc>,
) -> HorizontalCoordinate {
    let lat = observer_lat_deg.to_radians();
    let dec = declination_deg.to_radians();

    let gmst = greenwich_mean_sidereal_time(JulianDate::from_datetime(at_utc));
    let lst = local_sidereal_time(gmst, observer_lon_deg);
    let ha = hour_angle(lst, right_ascension_deg).to_radians();

    let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * ha.cos();
    let alt = sin_alt.clamp(-1.0, 1.0).asin();

    let y = ha.sin();
    let x = ha.cos() * lat.sin() - dec.tan() * lat.cos();
    let az = (y.atan2(x).to_degrees() + 360.0) % 360.0;

    HorizontalCoordinate {
        azimuth_deg: round_to(az, OUTPUT_DECIMALS) % 360.0,
        altitude_deg: round_to(alt.to_degrees(), OUTPUT_DECIMALS),
    }
}

/// Typed convenience wrapper around [`compute_az_alt`].
pub fn horizontal_position(
    observer: &GeoCoordinate,
    target: &EquatorialCoordinate,
    at_utc: DateTime<Utc>,
) -> HorizontalCoordinate {
    compute_az_alt(
        observer.latitude_deg,
        observer.longitude_deg,
        target.right_ascension_deg,
        target.declination_deg,
        at_utc,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 29, 16, 0, 0).unwrap()
    }

    #[test]
    fn test_from_lat_lon_wraps_longitude() {
        let eq = from_lat_lon(37.70443, -77.41832);
        assert!((eq.right_ascension_deg - 282.58168).abs() < 1e-9);
        assert_eq!(eq.declination_deg, 37.70443);

        assert_eq!(from_lat_lon(0.0, 0.0).right_ascension_deg, 0.0);
        assert_eq!(from_lat_lon(-30.0, 190.0).right_ascension_deg, 190.0);
        assert_eq!(from_lat_lon(45.0, -90.0).right_ascension_deg, 270.0);
    }

    #[test]
    fn test_from_lat_lon_keeps_negative_remainder() {
        let eq = from_lat_lon(10.0, -400.0);
        assert_eq!(eq.right_ascension_deg, -40.0);
        assert_eq!(eq.declination_deg, 10.0);
    }

    #[test]
    fn test_gmst_at_j2000() {
        let gmst = greenwich_mean_sidereal_time(JulianDate::new(2451545.0));
        assert!((gmst - 280.46061837).abs() < 1e-9);
    }

    #[test]
    fn test_lst_wraps_negative() {
        assert!((local_sidereal_time(10.0, -20.0) - 350.0).abs() < 1e-12);
        assert!((local_sidereal_time(350.0, 20.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_hour_angle_folding() {
        assert_eq!(hour_angle(10.0, 20.0), -10.0);
        assert_eq!(hour_angle(200.0, 10.0), 190.0 - 360.0);
        assert_eq!(hour_angle(190.0, 10.0), 180.0);
    }

    #[test]
    fn test_polaris_reference_position() {
        let pos = compute_az_alt(37.70443, -77.41832, 37.9546, 89.2641, reference_time());
        assert!((pos.azimuth_deg - 180.8895).abs() < 1e-3, "az={}", pos.azimuth_deg);
        assert!((pos.altitude_deg - 37.49261).abs() < 1e-3, "alt={}", pos.altitude_deg);
    }

    #[test]
    fn test_equator_object_at_j2000() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let pos = compute_az_alt(0.0, 0.0, 0.0, 0.0, at);
        assert!((pos.azimuth_deg - 270.0).abs() < 1e-6);
        assert!((pos.altitude_deg - 10.46062).abs() < 1e-4);
    }

    #[test]
    fn test_outputs_have_five_decimals() {
        let pos = compute_az_alt(51.4779, -0.0015, 279.2347, 38.7837, reference_time());
        assert_eq!(round_to(pos.azimuth_deg, 5), pos.azimuth_deg);
        assert_eq!(round_to(pos.altitude_deg, 5), pos.altitude_deg);
    }

    #[test]
    fn test_pole_observer_does_not_panic() {
        let pos = compute_az_alt(90.0, 0.0, 0.0, 90.0, reference_time());
        assert!((0.0..360.0).contains(&pos.azimuth_deg));
        assert!((-90.0..=90.0).contains(&pos.altitude_deg));
    }

    proptest! {
        #[test]
        fn prop_outputs_in_range(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            ra in 0.0f64..360.0,
            dec in -90.0f64..=90.0,
            secs in 0i64..4_102_444_800,
        ) {
            let at = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let pos = compute_az_alt(lat, lon, ra, dec, at);
            prop_assert!(pos.azimuth_deg >= 0.0 && pos.azimuth_deg < 360.0);
            prop_assert!(pos.altitude_deg >= -90.0 && pos.altitude_deg <= 90.0);
        }

        #[test]
        fn prop_is_idempotent(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            ra in 0.0f64..360.0,
            dec in -89.0f64..=89.0,
            secs in 0i64..4_102_444_800,
        ) {
            let at = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            prop_assert_eq!(
                compute_az_alt(lat, lon, ra, dec, at),
                compute_az_alt(lat, lon, ra, dec, at)
            );
        }
    }
}
