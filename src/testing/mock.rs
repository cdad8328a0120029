//! Deterministic in-memory orchestrator.
//!
//! Simulates the external orchestration service closely enough to exercise
//! every harness flow: it serves catalogs and annotated schemas derived
//! from a stream registry, applies field selection the way the real
//! service does (deselection never removes `automatic` fields from
//! replication), and replays scripted record counts and persisted state
//! for sync runs.

use async_trait::async_trait;
use bookmark::BookmarkState;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use stream_meta::StreamRegistry;

use crate::orchestrator::{
    AnnotatedSchema, CatalogEntry, ExitStatus, FieldProperties, Inclusion, MetadataEntry,
    Orchestrator,
};

/// Non-automatic fields every mock schema carries, so deselection has
/// something to strip.
const AVAILABLE_FIELDS: &[&str] = &["created_by", "links"];

#[derive(Default)]
struct MockInner {
    catalogs: Vec<CatalogEntry>,
    schemas: BTreeMap<String, AnnotatedSchema>,
    record_counts: BTreeMap<String, u64>,
    persisted_state: BookmarkState,
    injected_state: Option<BookmarkState>,
    checked: bool,
    synced: bool,
}

/// In-memory [`Orchestrator`] implementation for harness tests.
pub struct MockOrchestrator {
    inner: Mutex<MockInner>,
}

impl MockOrchestrator {
    /// Build a mock whose catalog mirrors the given registry.
    ///
    /// Every stream gets its automatic fields (inclusion `automatic`) plus
    /// a fixed pair of `available` fields, one record per sync run, and no
    /// persisted state until one is scripted.
    pub fn for_registry(registry: &StreamRegistry) -> Self {
        let mut inner = MockInner::default();

        for spec in registry.iter() {
            let stream_id = format!("{}-schema", spec.name);
            inner.catalogs.push(CatalogEntry {
                stream_id: stream_id.clone(),
                stream_name: spec.name.clone(),
            });

            let mut properties = BTreeMap::new();
            for field in spec.automatic_fields() {
                properties.insert(
                    field,
                    FieldProperties {
                        selected: None,
                        inclusion: Inclusion::Automatic,
                    },
                );
            }
            for field in AVAILABLE_FIELDS {
                properties.insert(
                    field.to_string(),
                    FieldProperties {
                        selected: None,
                        inclusion: Inclusion::Available,
                    },
                );
            }

            let metadata = build_metadata(None, &properties);
            inner.schemas.insert(
                stream_id,
                AnnotatedSchema {
                    selected: None,
                    properties,
                    metadata,
                },
            );

            inner.record_counts.insert(spec.name.clone(), 1);
        }

        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Drop one stream from the catalog, to exercise discovery-mismatch
    /// failures.
    pub fn without_stream(self, stream_name: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.catalogs.retain(|entry| entry.stream_name != stream_name);
        }
        self
    }

    /// Script the outcome of the next sync run.
    pub fn script_sync(&self, record_counts: BTreeMap<String, u64>, state: BookmarkState) {
        let mut inner = self.inner.lock().unwrap();
        inner.record_counts = record_counts;
        inner.persisted_state = state;
    }

    /// State injected via [`Orchestrator::set_state`], if any.
    pub fn injected_state(&self) -> Option<BookmarkState> {
        self.inner.lock().unwrap().injected_state.clone()
    }
}

/// Rebuild breadcrumb metadata from stream selection and field flags.
fn build_metadata(
    stream_selected: Option<bool>,
    properties: &BTreeMap<String, FieldProperties>,
) -> Vec<MetadataEntry> {
    let mut metadata = vec![MetadataEntry {
        breadcrumb: Vec::new(),
        selected: stream_selected,
        inclusion: None,
    }];
    for (field, props) in properties {
        metadata.push(MetadataEntry {
            breadcrumb: vec!["properties".to_string(), field.clone()],
            selected: props.selected,
            inclusion: Some(props.inclusion),
        });
    }
    metadata
}

#[async_trait]
impl Orchestrator for MockOrchestrator {
    async fn run_check_mode(&self) -> anyhow::Result<ExitStatus> {
        let mut inner = self.inner.lock().unwrap();
        inner.checked = true;
        Ok(ExitStatus {
            discovery_exit_code: Some(0),
            ..Default::default()
        })
    }

    async fn get_catalogs(&self) -> anyhow::Result<Vec<CatalogEntry>> {
        let inner = self.inner.lock().unwrap();
        anyhow::ensure!(inner.checked, "no check-mode run has been performed");
        Ok(inner.catalogs.clone())
    }

    async fn get_annotated_schema(&self, stream_id: &str) -> anyhow::Result<AnnotatedSchema> {
        let inner = self.inner.lock().unwrap();
        inner
            .schemas
            .get(stream_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown stream_id: {stream_id}"))
    }

    async fn select_fields(
        &self,
        entry: &CatalogEntry,
        _schema: &AnnotatedSchema,
        deselected: &BTreeSet<String>,
    ) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let schema = inner
            .schemas
            .get_mut(&entry.stream_id)
            .ok_or_else(|| anyhow::anyhow!("unknown stream_id: {}", entry.stream_id))?;

        schema.selected = Some(true);
        for (field, props) in schema.properties.iter_mut() {
            props.selected = Some(!deselected.contains(field));
        }
        schema.metadata = build_metadata(schema.selected, &schema.properties);
        Ok(())
    }

    async fn run_sync_mode(&self) -> anyhow::Result<ExitStatus> {
        let mut inner = self.inner.lock().unwrap();
        anyhow::ensure!(inner.checked, "no check-mode run has been performed");
        inner.synced = true;
        Ok(ExitStatus {
            tap_exit_code: Some(0),
            target_exit_code: Some(0),
            ..Default::default()
        })
    }

    async fn get_record_counts(
        &self,
        streams: &BTreeSet<String>,
        _primary_keys: &BTreeMap<String, BTreeSet<String>>,
    ) -> anyhow::Result<BTreeMap<String, u64>> {
        let inner = self.inner.lock().unwrap();
        anyhow::ensure!(inner.synced, "no sync run has been performed");
        Ok(inner
            .record_counts
            .iter()
            .filter(|(stream, _)| streams.contains(*stream))
            .map(|(stream, count)| (stream.clone(), *count))
            .collect())
    }

    async fn get_persisted_state(&self) -> anyhow::Result<BookmarkState> {
        let inner = self.inner.lock().unwrap();
        anyhow::ensure!(inner.synced, "no sync run has been performed");
        Ok(inner.persisted_state.clone())
    }

    async fn set_state(&self, state: &BookmarkState) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.injected_state = Some(state.clone());
        Ok(())
    }
}
