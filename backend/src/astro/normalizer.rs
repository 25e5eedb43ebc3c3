//! Decimal-degree coordinate string parsing.
//!
//! Accepts plain signed decimals (`"-77.41832"`) and decimals followed by a
//! hemisphere letter (`"77.41832W"`). When a hemisphere letter is present it
//! decides the sign: `"-77.4W"` and `"77.4W"` both yield `-77.4`.
//!
//! Range checks are left to the caller; this only parses and rounds.

use super::round_to;

/// Number of decimal places kept after parsing.
pub const COORDINATE_DECIMALS: i32 = 5;

fn hemisphere_sign(c: char) -> Option<f64> {
    match c {
        'N' | 'n' | 'E' | 'e' => Some(1.0),
        'S' | 's' | 'W' | 'w' => Some(-1.0),
        _ => None,
    }
}

fn parse_plain_decimal(s: &str) -> Option<f64> {
    if s.is_empty()
        || !s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a decimal-degree string into a signed value rounded to 5 decimals.
///
/// Returns `None` for missing, blank or non-decimal input (including
/// degree-minute-second notation).
///
/// # Examples
/// ```
/// use star_tracker::astro::parse_decimal_degrees;
///
/// assert_eq!(parse_decimal_degrees(Some("37.70443N")), Some(37.70443));
/// assert_eq!(parse_decimal_degrees(Some("-77.41832W")), Some(-77.41832));
/// assert_eq!(parse_decimal_degrees(Some("not-a-number")), None);
/// ```
pub fn parse_decimal_degrees(input: Option<&str>) -> Option<f64> {
    let s = input?.trim();
    let last = s.chars().last()?;

    let (numeric, sign) = match hemisphere_sign(last) {
        Some(sign) => (s[..s.len() - last.len_utf8()].trim(), Some(sign)),
        None => (s, None),
    };

    let parsed = parse_plain_decimal(numeric)?;
    let signed = match sign {
        Some(sign) => parsed.abs() * sign,
        None => parsed,
    };

    Some(round_to(signed, COORDINATE_DECIMALS))
}
