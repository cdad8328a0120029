//! Registry of every stream the connector is expected to discover.

use crate::streams::{ReplicationMethod, StreamSpec};
use std::collections::{BTreeMap, BTreeSet};

/// Error type for registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Stream not present in the registry
    #[error("Stream not found: {0}")]
    UnknownStream(String),
}

/// Immutable map of stream name to expected replication contract.
///
/// Built once per scenario and only read afterwards, so tests may share a
/// registry across threads freely. Callers should only query streams
/// returned by [`StreamRegistry::stream_names`]; looking up anything else
/// is a test-authoring error and fails with
/// [`MetadataError::UnknownStream`].
#[derive(Debug, Clone)]
pub struct StreamRegistry {
    streams: BTreeMap<String, StreamSpec>,
}

impl StreamRegistry {
    /// Create a registry from a list of stream specs.
    pub fn new(specs: Vec<StreamSpec>) -> Self {
        let streams = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        Self { streams }
    }

    /// The full ActiveCampaign stream table.
    ///
    /// Every stream is keyed by `id`. Incremental streams cursor on the
    /// API's per-resource modification field, which the connector exposes
    /// under a handful of names (`updated_timestamp`, `mdate`, `udate`,
    /// `tstamp`, ...).
    pub fn activecampaign() -> Self {
        Self::new(vec![
            StreamSpec::incremental("accounts", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("account_contacts", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("account_custom_fields", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("account_custom_field_values", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("activities", &["id"], &["tstamp"]),
            StreamSpec::full_table("addresses", &["id"]),
            StreamSpec::incremental("automation_blocks", &["id"], &["mdate"]),
            StreamSpec::incremental("automations", &["id"], &["mdate"]),
            StreamSpec::incremental("bounce_logs", &["id"], &["updated_timestamp"]),
            StreamSpec::full_table("brandings", &["id"]),
            StreamSpec::incremental("calendars", &["id"], &["mdate"]),
            StreamSpec::incremental("campaign_links", &["id"], &["updated_timestamp"]),
            StreamSpec::full_table("campaign_lists", &["id"]),
            StreamSpec::full_table("campaign_messages", &["id"]),
            StreamSpec::incremental("campaigns", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("configs", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("contact_automations", &["id"], &["lastdate"]),
            StreamSpec::incremental("contact_conversions", &["id"], &["cdate"]),
            StreamSpec::full_table("contact_custom_fields", &["id"]),
            StreamSpec::full_table("contact_custom_field_options", &["id"]),
            StreamSpec::full_table("contact_custom_field_rels", &["id"]),
            StreamSpec::incremental("contact_custom_field_values", &["id"], &["udate"]),
            StreamSpec::incremental("contact_data", &["id"], &["tstamp"]),
            StreamSpec::incremental("contact_deals", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("contact_emails", &["id"], &["sdate"]),
            StreamSpec::incremental("contact_lists", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("contact_tags", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("contacts", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("conversion_triggers", &["id"], &["udate"]),
            StreamSpec::incremental("conversions", &["id"], &["udate"]),
            StreamSpec::incremental("deal_activities", &["id"], &["cdate"]),
            StreamSpec::incremental("deal_custom_fields", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("deal_custom_field_values", &["id"], &["updated_timestamp"]),
            StreamSpec::full_table("deal_group_users", &["id"]),
            StreamSpec::incremental("deal_groups", &["id"], &["udate"]),
            StreamSpec::incremental("deal_stages", &["id"], &["udate"]),
            StreamSpec::incremental("deals", &["id"], &["mdate"]),
            StreamSpec::incremental("ecommerce_connections", &["id"], &["udate"]),
            StreamSpec::incremental("ecommerce_customers", &["id"], &["tstamp"]),
            StreamSpec::incremental("ecommerce_order_activities", &["id"], &["updated_date"]),
            StreamSpec::full_table("ecommerce_order_products", &["id"]),
            StreamSpec::incremental("ecommerce_orders", &["id"], &["updated_date"]),
            StreamSpec::incremental("email_activities", &["id"], &["tstamp"]),
            StreamSpec::incremental("forms", &["id"], &["udate"]),
            StreamSpec::full_table("goals", &["id"]),
            StreamSpec::full_table("groups", &["id"]),
            StreamSpec::incremental("lists", &["id"], &["updated_timestamp"]),
            StreamSpec::incremental("messages", &["id"], &["mdate"]),
            StreamSpec::incremental("saved_responses", &["id"], &["mdate"]),
            StreamSpec::incremental("scores", &["id"], &["mdate"]),
            StreamSpec::full_table("segments", &["id"]),
            StreamSpec::incremental("site_messages", &["id"], &["ldate"]),
            StreamSpec::incremental("sms", &["id"], &["tstamp"]),
            StreamSpec::full_table("tags", &["id"]),
            StreamSpec::full_table("task_types", &["id"]),
            StreamSpec::incremental("tasks", &["id"], &["udate"]),
            StreamSpec::incremental("templates", &["id"], &["mdate"]),
            StreamSpec::full_table("users", &["id"]),
            StreamSpec::full_table("webhooks", &["id"]),
        ])
    }

    /// Get a stream spec by name.
    pub fn get(&self, stream: &str) -> Result<&StreamSpec, MetadataError> {
        self.streams
            .get(stream)
            .ok_or_else(|| MetadataError::UnknownStream(stream.to_string()))
    }

    /// All registered stream names.
    pub fn stream_names(&self) -> BTreeSet<&str> {
        self.streams.keys().map(|name| name.as_str()).collect()
    }

    /// Iterate over every registered stream spec.
    pub fn iter(&self) -> impl Iterator<Item = &StreamSpec> {
        self.streams.values()
    }

    /// Number of registered streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether the registry is empty. A usable registry never is.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Primary key fields of a stream.
    pub fn primary_keys_of(&self, stream: &str) -> Result<&BTreeSet<String>, MetadataError> {
        Ok(&self.get(stream)?.primary_keys)
    }

    /// Replication key fields of a stream; empty for full-table streams.
    pub fn replication_keys_of(&self, stream: &str) -> Result<&BTreeSet<String>, MetadataError> {
        Ok(&self.get(stream)?.replication_keys)
    }

    /// Replication method of a stream.
    pub fn replication_method_of(&self, stream: &str) -> Result<ReplicationMethod, MetadataError> {
        Ok(self.get(stream)?.replication_method)
    }

    /// Whether a stream filters records by the configured start date.
    pub fn obeys_start_date(&self, stream: &str) -> Result<bool, MetadataError> {
        Ok(self.get(stream)?.obeys_start_date)
    }

    /// Fields always selected for a stream: primary keys plus replication keys.
    pub fn automatic_fields_of(&self, stream: &str) -> Result<BTreeSet<String>, MetadataError> {
        Ok(self.get(stream)?.automatic_fields())
    }

    /// Expected primary keys for every stream.
    pub fn expected_primary_keys(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.streams
            .values()
            .map(|spec| (spec.name.clone(), spec.primary_keys.clone()))
            .collect()
    }

    /// Expected replication keys for every stream.
    pub fn expected_replication_keys(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.streams
            .values()
            .map(|spec| (spec.name.clone(), spec.replication_keys.clone()))
            .collect()
    }

    /// Expected replication method for every stream.
    pub fn expected_replication_methods(&self) -> BTreeMap<String, ReplicationMethod> {
        self.streams
            .values()
            .map(|spec| (spec.name.clone(), spec.replication_method))
            .collect()
    }

    /// Expected automatic fields for every stream.
    pub fn expected_automatic_fields(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.streams
            .values()
            .map(|spec| (spec.name.clone(), spec.automatic_fields()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_not_empty() {
        let registry = StreamRegistry::activecampaign();

        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 59);
        assert_eq!(registry.stream_names().len(), 59);
    }

    #[test]
    fn test_automatic_fields_are_pk_union_replication_keys() {
        let registry = StreamRegistry::activecampaign();

        for spec in registry.iter() {
            let expected: BTreeSet<String> = spec
                .primary_keys
                .union(&spec.replication_keys)
                .cloned()
                .collect();
            assert_eq!(
                registry.automatic_fields_of(&spec.name).unwrap(),
                expected,
                "automatic fields mismatch for {}",
                spec.name
            );
        }
    }

    #[test]
    fn test_primary_keys_never_empty() {
        let registry = StreamRegistry::activecampaign();

        for spec in registry.iter() {
            assert!(
                !spec.primary_keys.is_empty(),
                "{} has no primary keys",
                spec.name
            );
        }
    }

    #[test]
    fn test_replication_keys_match_method() {
        let registry = StreamRegistry::activecampaign();

        for spec in registry.iter() {
            match spec.replication_method {
                ReplicationMethod::FullTable => assert!(
                    spec.replication_keys.is_empty(),
                    "full-table stream {} has replication keys",
                    spec.name
                ),
                ReplicationMethod::Incremental => assert!(
                    !spec.replication_keys.is_empty(),
                    "incremental stream {} has no replication keys",
                    spec.name
                ),
            }
        }
    }

    #[test]
    fn test_start_date_follows_method() {
        let registry = StreamRegistry::activecampaign();

        for spec in registry.iter() {
            let incremental = spec.replication_method == ReplicationMethod::Incremental;
            assert_eq!(
                spec.obeys_start_date, incremental,
                "start-date flag mismatch for {}",
                spec.name
            );
        }
    }

    #[test]
    fn test_accounts_contract() {
        let registry = StreamRegistry::activecampaign();

        let fields = registry.automatic_fields_of("accounts").unwrap();
        let expected: BTreeSet<String> = ["id", "updated_timestamp"]
            .iter()
            .map(|f| f.to_string())
            .collect();
        assert_eq!(fields, expected);

        assert_eq!(
            registry.replication_method_of("accounts").unwrap(),
            ReplicationMethod::Incremental
        );
        assert!(registry.obeys_start_date("accounts").unwrap());
    }

    #[test]
    fn test_full_table_stream_contract() {
        let registry = StreamRegistry::activecampaign();

        assert_eq!(
            registry.replication_method_of("users").unwrap(),
            ReplicationMethod::FullTable
        );
        assert!(registry.replication_keys_of("users").unwrap().is_empty());
        assert!(!registry.obeys_start_date("users").unwrap());

        // Only the primary key is automatic for full-table streams
        let fields = registry.automatic_fields_of("users").unwrap();
        assert_eq!(fields.len(), 1);
        assert!(fields.contains("id"));
    }

    #[test]
    fn test_unknown_stream_fails() {
        let registry = StreamRegistry::activecampaign();

        let result = registry.automatic_fields_of("nonexistent");
        assert!(matches!(result, Err(MetadataError::UnknownStream(_))));
    }

    #[test]
    fn test_expected_maps_cover_every_stream() {
        let registry = StreamRegistry::activecampaign();

        assert_eq!(registry.expected_primary_keys().len(), registry.len());
        assert_eq!(registry.expected_replication_keys().len(), registry.len());
        assert_eq!(registry.expected_replication_methods().len(), registry.len());
        assert_eq!(registry.expected_automatic_fields().len(), registry.len());

        // Full-table streams appear with an empty replication key set
        let replication_keys = registry.expected_replication_keys();
        assert!(replication_keys["tags"].is_empty());
        assert_eq!(
            replication_keys["deals"],
            ["mdate"].iter().map(|f| f.to_string()).collect()
        );
    }
}
