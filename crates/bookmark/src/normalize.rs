//! Canonical UTC normalization for connector-emitted timestamps.

use crate::error::BookmarkError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Canonical comparable form for bookmark values: second precision, UTC.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Offset-carrying formats, tried first so non-UTC offsets are converted
/// to UTC rather than rejected. `%.f` also matches an absent fraction.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Zulu-suffixed formats, parsed as naive datetimes already in UTC.
const ZULU_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ"];

/// Date-only format; the time is assumed to be midnight UTC.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp in any recognized format into a UTC instant.
///
/// The format matchers are tried in order; the first success wins.
/// Recognized shapes:
///
/// - `2021-04-01T12:00:00.123456+05:30` / `2020-08-25T13:17:36-07:00`
/// - `2021-12-01T00:00:00.000000Z` / `2021-12-01T00:00:00Z`
/// - `2021-12-01`
///
/// # Errors
///
/// Returns [`BookmarkError::UnsupportedFormat`] if no matcher accepts the
/// input.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, BookmarkError> {
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }

    for format in ZULU_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(BookmarkError::UnsupportedFormat(value.to_string()))
}

/// Normalize a timestamp string to [`CANONICAL_FORMAT`].
///
/// Offset-aware inputs are converted to UTC, not truncated; fractional
/// seconds are dropped.
///
/// # Errors
///
/// Returns [`BookmarkError::UnsupportedFormat`] if the input matches none
/// of the recognized formats.
pub fn normalize(value: &str) -> Result<String, BookmarkError> {
    Ok(parse_datetime(value)?.format(CANONICAL_FORMAT).to_string())
}
