//! Instant parsing and timezone presentation.
//!
//! The engine works purely on UTC instants. These helpers sit at the edges:
//! turning caller strings into instants, and rendering instants in a zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SchedulerError};

/// Parse an RFC 3339 timestamp (with offset) into a UTC instant.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulerError::InvalidTimestamp(format!("{s}: {e}")))
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SchedulerError::InvalidTimezone(name.to_string()))
}

/// Parse an RFC 3339 timestamp and express it in `timezone`.
pub fn parse_in_timezone(s: &str, timezone: &str) -> Result<DateTime<Tz>> {
    let tz = parse_timezone(timezone)?;
    Ok(parse_instant(s)?.with_timezone(&tz))
}

/// The same instant, viewed in `timezone`.
pub fn to_timezone(instant: DateTime<Utc>, timezone: &str) -> Result<DateTime<Tz>> {
    Ok(instant.with_timezone(&parse_timezone(timezone)?))
}

/// Render an instant as RFC 3339 in `timezone`.
pub fn format_in_timezone(instant: DateTime<Utc>, timezone: &str) -> Result<String> {
    Ok(to_timezone(instant, timezone)?.to_rfc3339())
}

/// The zone abbreviation in effect at `instant` (e.g. "PDT" vs "PST").
pub fn abbreviation(timezone: &str, instant: DateTime<Utc>) -> Result<String> {
    Ok(to_timezone(instant, timezone)?.format("%Z").to_string())
}
