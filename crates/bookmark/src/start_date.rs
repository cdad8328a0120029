//! Start-date fixtures in the tap's configured format.

use crate::error::BookmarkError;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Format of the `start_date` setting the tap is configured with.
///
/// The time component is fixed at midnight UTC; only the date varies.
pub const START_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

/// Render an instant as a start-date value, dropping the time component.
pub fn format_start_date(instant: DateTime<Utc>) -> String {
    instant.format(START_DATE_FORMAT).to_string()
}

/// Add `days` to a start-date value and re-render it in the same format.
///
/// Used to build fixtures with start dates relative to the current run.
/// This helper deliberately accepts only [`START_DATE_FORMAT`] - dates the
/// harness itself produced - and not the broader set of connector-emitted
/// formats that [`crate::normalize`] handles.
///
/// # Errors
///
/// Returns [`BookmarkError::FormatMismatch`] if the input is not already
/// in [`START_DATE_FORMAT`].
pub fn shift_start_date(date: &str, days: i64) -> Result<String, BookmarkError> {
    let parsed = NaiveDate::parse_from_str(date, START_DATE_FORMAT).map_err(|_| {
        BookmarkError::FormatMismatch {
            value: date.to_string(),
            expected: START_DATE_FORMAT,
        }
    })?;

    let shifted = parsed + Duration::days(days);
    Ok(shifted.format(START_DATE_FORMAT).to_string())
}
