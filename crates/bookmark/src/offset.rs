//! Synthetic prior-bookmark computation for incremental-sync verification.

use crate::error::BookmarkError;
use crate::normalize::parse_datetime;
use crate::start_date::format_start_date;
use crate::state::BookmarkState;
use chrono::Duration;

/// Offset subtracted from each recorded bookmark to produce the state
/// injected before a second sync run.
///
/// The default is one minute with zero days and hours, so the second sync
/// window overlaps minimally with already-synced data while staying
/// deterministic. Scenarios that need a wider window configure their own
/// offset instead of relying on the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkOffset {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl Default for BookmarkOffset {
    fn default() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 1,
        }
    }
}

impl BookmarkOffset {
    /// Create an offset from explicit components.
    pub fn new(days: i64, hours: i64, minutes: i64) -> Self {
        Self {
            days,
            hours,
            minutes,
        }
    }

    fn to_duration(self) -> Duration {
        Duration::days(self.days) + Duration::hours(self.hours) + Duration::minutes(self.minutes)
    }
}

/// Compute the state to inject before a second sync run.
///
/// For every stream present in `current`, the recorded cursor is parsed,
/// moved `offset` into the past, and re-rendered in the start-date format.
/// Streams without a recorded bookmark are left out of the result; no
/// synthetic entry is fabricated for them.
///
/// The second sync is then expected to replicate only records at or after
/// the calculated point, which is what makes bookmark progression
/// verifiable.
///
/// # Errors
///
/// Returns [`BookmarkError::UnsupportedFormat`] if any recorded bookmark
/// cannot be parsed.
pub fn calculated_states(
    current: &BookmarkState,
    offset: BookmarkOffset,
) -> Result<BookmarkState, BookmarkError> {
    let mut calculated = BookmarkState::new();

    for (stream, value) in &current.bookmarks {
        let cursor = parse_datetime(value)?;
        let earlier = cursor - offset.to_duration();
        calculated
            .bookmarks
            .insert(stream.clone(), format_start_date(earlier));
    }

    Ok(calculated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offset_is_one_minute() {
        let offset = BookmarkOffset::default();
        assert_eq!(offset, BookmarkOffset::new(0, 0, 1));
    }

    #[test]
    fn test_one_minute_before_midnight_cursor() {
        let state = BookmarkState::new().with_bookmark("contacts", "2021-12-02T00:01:00Z");

        let calculated = calculated_states(&state, BookmarkOffset::default()).unwrap();

        assert_eq!(calculated.get("contacts"), Some("2021-12-02T00:00:00Z"));
    }

    #[test]
    fn test_result_is_rendered_as_start_date() {
        // Mid-day cursors collapse to the date at midnight UTC.
        let state = BookmarkState::new().with_bookmark("deals", "2021-12-02T05:30:00Z");

        let calculated = calculated_states(&state, BookmarkOffset::default()).unwrap();

        assert_eq!(calculated.get("deals"), Some("2021-12-02T00:00:00Z"));
    }

    #[test]
    fn test_day_offset_moves_the_date() {
        let state = BookmarkState::new().with_bookmark("deals", "2021-12-02T05:30:00Z");

        let calculated = calculated_states(&state, BookmarkOffset::new(3, 0, 0)).unwrap();

        assert_eq!(calculated.get("deals"), Some("2021-11-29T00:00:00Z"));
    }

    #[test]
    fn test_every_calculated_value_is_strictly_earlier() {
        let state = BookmarkState::new()
            .with_bookmark("contacts", "2021-12-02T00:01:00Z")
            .with_bookmark("deals", "2021-12-02T00:00:00Z")
            .with_bookmark("activities", "2021-12-05T17:45:12Z");

        let calculated = calculated_states(&state, BookmarkOffset::default()).unwrap();

        assert_eq!(calculated.len(), state.len());
        for (stream, value) in &state.bookmarks {
            let original = parse_datetime(value).unwrap();
            let earlier = parse_datetime(calculated.get(stream).unwrap()).unwrap();
            assert!(earlier < original, "no progress for {stream}");
        }
    }

    #[test]
    fn test_streams_without_bookmarks_are_absent() {
        let state = BookmarkState::new().with_bookmark("contacts", "2021-12-02T00:01:00Z");

        let calculated = calculated_states(&state, BookmarkOffset::default()).unwrap();

        assert_eq!(calculated.len(), 1);
        assert_eq!(calculated.get("tags"), None);
    }

    #[test]
    fn test_offset_aware_bookmark_is_converted_first() {
        let state = BookmarkState::new().with_bookmark("contacts", "2020-08-25T13:17:36-07:00");

        // 20:17:36 UTC minus a minute, rendered as a start date.
        let calculated = calculated_states(&state, BookmarkOffset::default()).unwrap();

        assert_eq!(calculated.get("contacts"), Some("2020-08-25T00:00:00Z"));
    }

    #[test]
    fn test_unparseable_bookmark_propagates() {
        let state = BookmarkState::new().with_bookmark("contacts", "not-a-date");

        let result = calculated_states(&state, BookmarkOffset::default());

        assert!(matches!(result, Err(BookmarkError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_empty_state_yields_empty_state() {
        let calculated =
            calculated_states(&BookmarkState::new(), BookmarkOffset::default()).unwrap();
        assert!(calculated.is_empty());
    }
}
