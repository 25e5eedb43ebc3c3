//! Human-readable pointing directions.

/// 16-point compass rose, clockwise from north.
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

const SECTOR_WIDTH_DEG: f64 = 22.5;
const POLE_STAR: &str = "Polaris";
/// How close to north the pole star must be for the "look north" phrasing.
const NORTH_TOLERANCE_DEG: f64 = 10.0;

/// Compass label for an azimuth already reduced to [0, 360).
pub fn compass_point(azimuth_deg: f64) -> &'static str {
    let sector = (azimuth_deg / SECTOR_WIDTH_DEG).round_ties_even() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

/// Produce pointing guidance for a target at the given azimuth/altitude.
///
/// Inputs must be finite. Rounded degrees are printed as integers.
pub fn generate_guidance(azimuth_deg: f64, altitude_deg: f64, target: &str) -> String {
    let az = ((azimuth_deg % 360.0) + 360.0) % 360.0;
    let compass = match compass_point(az) {
        "N" => "due north",
        other => other,
    };

    let alt_rounded = altitude_deg.round_ties_even() as i64;
    let az_rounded = az.round_ties_even() as i64;

    if target.eq_ignore_ascii_case(POLE_STAR) {
        if az.abs() < NORTH_TOLERANCE_DEG || (az - 360.0).abs() < NORTH_TOLERANCE_DEG {
            return format!(
                "Look {compass} at about {alt_rounded}° up for the brightest object — that's Polaris!"
            );
        }

        return format!(
            "Face {compass} (approx {az_rounded}°), then look {alt_rounded}° up to see Polaris."
        );
    }

    format!("Face {compass} (≈{az_rounded}°), then look {alt_rounded}° up to find {target}.")
}
