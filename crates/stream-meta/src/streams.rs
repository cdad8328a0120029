//! Per-stream replication contract types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the connector replicates a stream on each sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplicationMethod {
    /// Re-extracts the entire dataset every sync; no cursor is kept.
    #[serde(rename = "FULL_TABLE")]
    FullTable,

    /// Extracts only records at or after the last bookmark.
    #[serde(rename = "INCREMENTAL")]
    Incremental,
}

impl ReplicationMethod {
    /// Get the string representation of this method, as it appears in
    /// catalog metadata emitted by the connector.
    pub fn as_str(&self) -> &str {
        match self {
            ReplicationMethod::FullTable => "FULL_TABLE",
            ReplicationMethod::Incremental => "INCREMENTAL",
        }
    }
}

impl std::fmt::Display for ReplicationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected replication contract for a single stream.
///
/// Fixed at definition time; the registry never mutates a spec after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSpec {
    /// Unique stream identifier
    pub name: String,

    /// Field names uniquely identifying a record; never empty
    pub primary_keys: BTreeSet<String>,

    /// Replication method the connector advertises for this stream
    pub replication_method: ReplicationMethod,

    /// Field names used as sync cursors; empty iff full-table
    pub replication_keys: BTreeSet<String>,

    /// Whether the stream filters records by the configured start date
    pub obeys_start_date: bool,
}

impl StreamSpec {
    /// Create an incremental stream spec.
    ///
    /// Incremental streams filter by the configured start date.
    pub fn incremental(
        name: impl Into<String>,
        primary_keys: &[&str],
        replication_keys: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            primary_keys: primary_keys.iter().map(|k| k.to_string()).collect(),
            replication_method: ReplicationMethod::Incremental,
            replication_keys: replication_keys.iter().map(|k| k.to_string()).collect(),
            obeys_start_date: true,
        }
    }

    /// Create a full-table stream spec.
    ///
    /// Full-table streams carry no replication keys and ignore the
    /// configured start date.
    pub fn full_table(name: impl Into<String>, primary_keys: &[&str]) -> Self {
        Self {
            name: name.into(),
            primary_keys: primary_keys.iter().map(|k| k.to_string()).collect(),
            replication_method: ReplicationMethod::FullTable,
            replication_keys: BTreeSet::new(),
            obeys_start_date: false,
        }
    }

    /// Fields the connector must always emit regardless of user field
    /// selection: primary keys plus replication keys.
    pub fn automatic_fields(&self) -> BTreeSet<String> {
        self.primary_keys
            .union(&self.replication_keys)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replication_method_as_str() {
        assert_eq!(ReplicationMethod::FullTable.as_str(), "FULL_TABLE");
        assert_eq!(ReplicationMethod::Incremental.as_str(), "INCREMENTAL");
    }

    #[test]
    fn test_replication_method_serde() {
        let json = serde_json::to_string(&ReplicationMethod::Incremental).unwrap();
        assert_eq!(json, "\"INCREMENTAL\"");

        let parsed: ReplicationMethod = serde_json::from_str("\"FULL_TABLE\"").unwrap();
        assert_eq!(parsed, ReplicationMethod::FullTable);
    }

    #[test]
    fn test_incremental_spec() {
        let spec = StreamSpec::incremental("deals", &["id"], &["mdate"]);

        assert_eq!(spec.replication_method, ReplicationMethod::Incremental);
        assert!(spec.obeys_start_date);
        assert!(spec.replication_keys.contains("mdate"));
    }

    #[test]
    fn test_full_table_spec() {
        let spec = StreamSpec::full_table("tags", &["id"]);

        assert_eq!(spec.replication_method, ReplicationMethod::FullTable);
        assert!(!spec.obeys_start_date);
        assert!(spec.replication_keys.is_empty());
    }

    #[test]
    fn test_automatic_fields_union() {
        let spec = StreamSpec::incremental("contacts", &["id"], &["updated_timestamp"]);

        let fields = spec.automatic_fields();
        assert_eq!(fields.len(), 2);
        assert!(fields.contains("id"));
        assert!(fields.contains("updated_timestamp"));
    }
}
