//! Timestamp encoding for TEXT columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with microsecond
//! precision (`2024-05-01T09:30:00.000000Z`), so comparing the stored text
//! lexically gives chronological order and range filters can be evaluated by
//! SQLite without date functions.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};

/// Current time truncated to the stored precision.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Truncates anything finer than a microsecond.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `timestamp` rounded up to the stored precision. An inclusive lower bound
/// must round up, or a row stored just before it would still compare `>=`.
pub fn ceil_to_stored_precision(timestamp: &DateTime<Utc>) -> DateTime<Utc> {
    let truncated = timestamp.trunc_subsecs(6);
    if truncated < *timestamp {
        truncated + Duration::microseconds(1)
    } else {
        truncated
    }
}

/// Accepts any RFC 3339 offset, normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|parsed| parsed.with_timezone(&Utc))
}

/// The `updated_at` value for a write following `previous`: the current time,
/// or one microsecond past `previous` if the clock has not moved past it.
pub fn next_after(previous: &DateTime<Utc>) -> DateTime<Utc> {
    let candidate = now();
    let floor = previous.trunc_subsecs(6) + Duration::microseconds(1);
    candidate.max(floor)
}
