//! Interface to the external test orchestrator.
//!
//! The orchestration service that launches tap and target processes,
//! stores discovered catalogs, and persists connector state is consumed as
//! a black box behind the [`Orchestrator`] trait. The harness only depends
//! on the operations below; process management, retries, and timeouts are
//! the orchestrator's concern.
//!
//! [`crate::testing::MockOrchestrator`] provides a deterministic in-memory
//! implementation for the harness's own tests.

use async_trait::async_trait;
use bookmark::BookmarkState;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Exit codes the orchestrator reports for a tap/target job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStatus {
    /// Exit code of the discovery (check mode) process
    pub discovery_exit_code: Option<i32>,

    /// Exit code of the tap process during sync
    pub tap_exit_code: Option<i32>,

    /// Exit code of the target process during sync
    pub target_exit_code: Option<i32>,
}

impl ExitStatus {
    /// Whether a check-mode run exited cleanly.
    pub fn check_succeeded(&self) -> bool {
        self.discovery_exit_code == Some(0)
    }

    /// Whether both tap and target exited cleanly after a sync run.
    pub fn sync_succeeded(&self) -> bool {
        self.tap_exit_code == Some(0) && self.target_exit_code == Some(0)
    }
}

/// One discovered stream in the connection's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Orchestrator-assigned identifier for the discovered schema
    pub stream_id: String,

    /// Stream name as advertised by the connector
    pub stream_name: String,
}

/// Whether a field is forced into, available for, or excluded from
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    /// Always replicated regardless of user selection
    Automatic,
    /// Replicated only when selected
    Available,
    /// Never replicated
    Unsupported,
}

/// Selection flags for a single schema property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldProperties {
    /// User selection, if any has been applied
    pub selected: Option<bool>,

    /// How the connector treats the field
    pub inclusion: Inclusion,
}

/// One entry in a stream's selection metadata.
///
/// The breadcrumb is empty for the stream itself and
/// `["properties", <field>]` for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub breadcrumb: Vec<String>,
    pub selected: Option<bool>,
    pub inclusion: Option<Inclusion>,
}

/// Annotated schema for one stream, as stored by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotatedSchema {
    /// Whether the stream itself is selected
    pub selected: Option<bool>,

    /// Selection flags per field
    pub properties: BTreeMap<String, FieldProperties>,

    /// Breadcrumb-style selection metadata
    pub metadata: Vec<MetadataEntry>,
}

/// Operations the harness consumes from the orchestration service.
#[async_trait]
pub trait Orchestrator {
    /// Run the tap in check mode (discovery) and report its exit status.
    async fn run_check_mode(&self) -> anyhow::Result<ExitStatus>;

    /// Catalogs discovered by the last check-mode run.
    async fn get_catalogs(&self) -> anyhow::Result<Vec<CatalogEntry>>;

    /// Annotated schema for one discovered stream.
    async fn get_annotated_schema(&self, stream_id: &str) -> anyhow::Result<AnnotatedSchema>;

    /// Select a stream for replication, leaving `deselected` fields
    /// unselected.
    async fn select_fields(
        &self,
        entry: &CatalogEntry,
        schema: &AnnotatedSchema,
        deselected: &BTreeSet<String>,
    ) -> anyhow::Result<()>;

    /// Run a sync job and report tap/target exit status.
    async fn run_sync_mode(&self) -> anyhow::Result<ExitStatus>;

    /// Records emitted to the target per stream during the last sync,
    /// deduplicated by the given primary keys.
    async fn get_record_counts(
        &self,
        streams: &BTreeSet<String>,
        primary_keys: &BTreeMap<String, BTreeSet<String>>,
    ) -> anyhow::Result<BTreeMap<String, u64>>;

    /// State persisted by the connector at the end of the last sync.
    async fn get_persisted_state(&self) -> anyhow::Result<BookmarkState>;

    /// Replace the persisted state before the next sync run.
    async fn set_state(&self, state: &BookmarkState) -> anyhow::Result<()>;
}
