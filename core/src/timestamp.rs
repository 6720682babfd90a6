//! UTC timestamp helpers.
//!
//! Work order timestamps are stored as text, so the exact rendering matters:
//! second precision, always UTC, always a trailing `Z`.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// `strftime` pattern used to persist timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Returns the current UTC time truncated to whole seconds.
///
/// Truncation keeps in-memory values equal to what a later read of the same
/// row produces.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Renders a timestamp as ISO-8601 with a `Z` suffix.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use workorders_core::format_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2026, 10, 18, 9, 41, 7).unwrap();
/// assert_eq!(format_timestamp(&ts), "2026-10-18T09:41:07Z");
/// ```
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp.
///
/// Accepts the canonical `Z` form and, for rows written by other tools, any
/// RFC 3339 offset, which is normalized to UTC. Returns `None` for anything
/// else.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
