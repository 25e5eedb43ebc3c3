use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::*;

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00:00 TT, treated as UTC here).
pub const J2000_JULIAN_DATE: f64 = 2451545.0;

/// Julian Date representation.
/// JD 0 = -4712-01-01 12:00:00 (proleptic Julian calendar)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct JulianDate(f64);

impl JulianDate {
    /// Create a new JD value.
    pub fn new(v: f64) -> Self {
        Self(v)
    }

    /// Raw JD value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Days elapsed since the J2000.0 epoch.
    pub fn days_since_j2000(&self) -> f64 {
        self.0 - J2000_JULIAN_DATE
    }

    /// Create from chrono DateTime<Utc> using the civil-calendar formula.
    ///
    /// January and February count as months 13 and 14 of the previous year.
    /// The fractional day carries hours, minutes, seconds and milliseconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let mut year = dt.year();
        let mut month = dt.month() as i32;
        let day = dt.day() as f64
            + dt.hour() as f64 / 24.0
            + dt.minute() as f64 / 1440.0
            + dt.second() as f64 / 86400.0
            + dt.timestamp_subsec_millis() as f64 / 86_400_000.0;

        if month <= 2 {
            year -= 1;
            month += 12;
        }

        let a = year.div_euclid(100);
        let b = 2 - a + a.div_euclid(4);

        let jd = (365.25 * (year + 4716) as f64).floor()
            + (30.6001 * (month + 1) as f64).floor()
            + day
            + b as f64
            - 1524.5;
        Self(jd)
    }
}

impl From<f64> for JulianDate {
    fn from(v: f64) -> Self {
        JulianDate::new(v)
    }
}

impl From<DateTime<Utc>> for JulianDate {
    fn from(dt: DateTime<Utc>) -> Self {
        JulianDate::from_datetime(dt)
    }
}
