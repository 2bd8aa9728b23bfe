use chrono::{DateTime, Utc};

/// Julian day number of the Unix epoch (1970-01-01T00:00:00Z).
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a Julian-day timestamp (as stored for window and folder dates) to UTC.
///
/// Returns `None` for zero, non-finite, or out-of-range values; files written by old
/// releases leave these fields zeroed.
pub fn julian_day_to_datetime(julian_day: f64) -> Option<DateTime<Utc>> {
    if !julian_day.is_finite() || julian_day <= 0.0 {
        return None;
    }

    let seconds = ((julian_day - UNIX_EPOCH_JULIAN_DAY) * SECONDS_PER_DAY).round();
    if !(i64::MIN as f64..=i64::MAX as f64).contains(&seconds) {
        return None;
    }

    DateTime::from_timestamp(seconds as i64, 0)
}

/// Inverse of [`julian_day_to_datetime`], used by fixtures and round-trip checks.
pub fn datetime_to_julian_day(value: DateTime<Utc>) -> f64 {
    value.timestamp() as f64 / SECONDS_PER_DAY + UNIX_EPOCH_JULIAN_DAY
}
