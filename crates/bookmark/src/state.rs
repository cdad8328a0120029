//! Persisted connector state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State document the connector persists at the end of a sync run.
///
/// Maps each stream to the last successfully replicated cursor value. The
/// harness reads one per sync run for comparison; it never persists state
/// itself.
///
/// # Wire Format
///
/// ```json
/// {
///     "bookmarks": {
///         "contacts": "2021-12-02T00:01:00Z",
///         "deals": "2021-12-01T18:44:03Z"
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkState {
    /// Stream name to last replicated cursor value
    #[serde(default)]
    pub bookmarks: BTreeMap<String, String>,
}

impl BookmarkState {
    /// Create an empty state document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bookmark, consuming and returning the state for chaining.
    pub fn with_bookmark(mut self, stream: impl Into<String>, value: impl Into<String>) -> Self {
        self.bookmarks.insert(stream.into(), value.into());
        self
    }

    /// Bookmark value for a stream, if the connector recorded one.
    pub fn get(&self, stream: &str) -> Option<&str> {
        self.bookmarks.get(stream).map(|value| value.as_str())
    }

    /// Streams that have a recorded bookmark.
    pub fn streams(&self) -> impl Iterator<Item = &str> {
        self.bookmarks.keys().map(|name| name.as_str())
    }

    /// Number of recorded bookmarks.
    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    /// Whether no bookmarks were recorded.
    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}
