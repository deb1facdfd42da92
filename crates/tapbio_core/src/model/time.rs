//! Timestamp helpers for countdown targets and schedule windows.
//!
//! Timestamps are stored as strings on the wire. Editors may produce full
//! RFC 3339 values or shorter `datetime-local` values without a zone; the
//! short forms are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Formats `at` the way snapshot timestamps are written (`...T..:..:..sssZ`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored timestamp.
///
/// Returns `None` for blank or unrecognized input.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days left until `target`, floored, never negative.
pub fn days_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta_ms = target.timestamp_millis() - now.timestamp_millis();
    if delta_ms <= 0 {
        return 0;
    }
    delta_ms.div_euclid(MILLIS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::{days_remaining, format_timestamp, parse_timestamp, MILLIS_PER_DAY};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn parses_rfc3339_and_local_forms() {
        let full = parse_timestamp("2026-03-01T10:30:00.000Z").expect("rfc3339");
        let local = parse_timestamp("2026-03-01T10:30").expect("datetime-local");
        let date_only = parse_timestamp("2026-03-01").expect("date");

        assert_eq!(full, local);
        assert_eq!(date_only, Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
    }

    #[test]
    fn format_matches_millisecond_utc_shape() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 5, 0).unwrap();
        assert_eq!(format_timestamp(at), "2026-10-19T08:05:00.000Z");
    }

    #[test]
    fn days_remaining_floors_and_clamps() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(days_remaining(now + Duration::days(3), now), 3);
        assert_eq!(
            days_remaining(now + Duration::milliseconds(2 * MILLIS_PER_DAY - 1), now),
            1
        );
        assert_eq!(days_remaining(now + Duration::hours(23), now), 0);
        assert_eq!(days_remaining(now, now), 0);
        assert_eq!(days_remaining(now - Duration::days(5), now), 0);
    }
}
