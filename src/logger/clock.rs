//! Time sources for record timestamps.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use std::fmt::Write as _;
use std::sync::Arc;

/// A zero-argument source of the current instant.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Wall-clock time in UTC.
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// A clock frozen at `instant`, for deterministic output.
pub fn fixed_clock(instant: DateTime<Utc>) -> Clock {
    Arc::new(move || instant)
}

/// `0001-01-01T00:00:00Z`, the zero value of a timestamp.
pub fn zero_instant() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Renders `instant` as RFC 3339 in UTC with nanosecond precision.
///
/// Trailing zeros of the fractional part are dropped, and the fraction is
/// left out entirely on whole seconds: `2018-08-02T21:48:56.856339554Z`,
/// `2018-08-02T21:48:56.5Z`, `0001-01-01T00:00:00Z`.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    let mut out = instant.format("%Y-%m-%dT%H:%M:%S").to_string();
    // Leap seconds are carried as nanos >= 1e9; %S already shows :60.
    let nanos = instant.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let _ = write!(out, ".{nanos:09}");
        while out.ends_with('0') {
            out.pop();
        }
    }
    out.push('Z');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_instant_format() {
        assert_eq!(format_timestamp(&zero_instant()), "0001-01-01T00:00:00Z");
    }

    #[test]
    fn test_nanosecond_precision() {
        let instant: DateTime<Utc> = "2018-08-02T21:48:56.856339554Z".parse().unwrap();
        assert_eq!(format_timestamp(&instant), "2018-08-02T21:48:56.856339554Z");
    }

    #[test]
    fn test_trailing_zeros_trimmed() {
        let instant: DateTime<Utc> = "2018-08-02T21:48:56.500Z".parse().unwrap();
        assert_eq!(format_timestamp(&instant), "2018-08-02T21:48:56.5Z");

        let whole: DateTime<Utc> = "2018-08-02T21:48:56Z".parse().unwrap();
        assert_eq!(format_timestamp(&whole), "2018-08-02T21:48:56Z");
    }

    #[test]
    fn test_offset_input_is_rendered_in_utc() {
        let instant = DateTime::parse_from_rfc3339("2018-08-02T23:48:56+02:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&instant), "2018-08-02T21:48:56Z");
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let instant: DateTime<Utc> = "2020-01-01T00:00:00.000000001Z".parse().unwrap();
        let clock = fixed_clock(instant);
        assert_eq!(clock(), instant);
        assert_eq!(clock(), clock());
    }
}
