//! Parsing of VCS-reported timestamps into local naive time.

use chrono::{DateTime, Local, NaiveDateTime};

/// One way of reading a timestamp.
type Strategy = fn(&str) -> Option<NaiveDateTime>;

/// Tried in order; the first success wins.
const STRATEGIES: [Strategy; 3] = [offset_iso, naive_iso, leading_date_time];

/// Parses a VCS timestamp, converting zone-aware values to local time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    STRATEGIES.iter().find_map(|strategy| strategy(raw))
}

/// Like [`parse_timestamp`], substituting `fallback` when nothing matches.
pub fn parse_or(raw: &str, fallback: NaiveDateTime) -> NaiveDateTime {
    parse_timestamp(raw).unwrap_or_else(|| {
        tracing::debug!(raw, %fallback, "unparseable timestamp, using range start");
        fallback
    })
}

/// Strict ISO-8601 with an offset or a trailing `Z`.
fn offset_iso(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// ISO-8601 without an offset, already local.
fn naive_iso(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// `YYYY-MM-DD HH:MM:SS` from the first two space-separated tokens.
fn leading_date_time(raw: &str) -> Option<NaiveDateTime> {
    let mut tokens = raw.split(' ');
    let date = tokens.next()?;
    let time = tokens.next()?;
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_utc_marker_converts_to_local() {
        let expected = Utc
            .with_ymd_and_hms(2025, 9, 20, 0, 15, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_timestamp("2025-09-20T00:15:00Z"), Some(expected));
    }

    #[test]
    fn test_fractional_svn_dates_parse() {
        let expected = Utc
            .with_ymd_and_hms(2025, 9, 20, 3, 4, 5)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        let parsed = parse_timestamp("2025-09-20T03:04:05.123456Z").unwrap();
        assert_eq!(parsed.and_utc().timestamp(), expected.and_utc().timestamp());
    }

    #[test]
    fn test_naive_iso_is_taken_as_local() {
        assert_eq!(
            parse_timestamp("2025-09-20T09:15:00"),
            Some(local(2025, 9, 20, 9, 15, 0))
        );
    }

    #[test]
    fn test_space_separated_fallback_ignores_offset() {
        assert_eq!(
            parse_timestamp("2025-09-20 09:15:00 +0900"),
            Some(local(2025, 9, 20, 9, 15, 0))
        );
    }

    #[test]
    fn test_garbage_falls_back() {
        let fallback = local(2025, 9, 20, 0, 0, 0);
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        assert_eq!(parse_or("yesterday-ish", fallback), fallback);
        assert_eq!(parse_or("", fallback), fallback);
    }
}
