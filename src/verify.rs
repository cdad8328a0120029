//! Check-mode, field-selection, and sync verification flows.
//!
//! Each flow runs one phase of the tap lifecycle through the orchestrator
//! and asserts the outcome against the stream registry. Every failure
//! surfaces as an `anyhow` error with enough context to identify the
//! offending stream or field; nothing is retried.

use anyhow::{ensure, Context};
use std::collections::{BTreeMap, BTreeSet};
use stream_meta::StreamRegistry;
use tracing::info;

use crate::orchestrator::{CatalogEntry, Inclusion, MetadataEntry, Orchestrator};

/// Run the tap in check mode and verify discovery succeeded.
///
/// Runs prior to field selection and the initial sync. Verifies the exit
/// status, that at least one schema was discovered, and that the set of
/// discovered stream names matches the registry exactly.
///
/// Returns the discovered catalogs for subsequent selection.
pub async fn verify_check_mode<O: Orchestrator + ?Sized>(
    orchestrator: &O,
    registry: &StreamRegistry,
) -> anyhow::Result<Vec<CatalogEntry>> {
    let exit_status = orchestrator
        .run_check_mode()
        .await
        .context("check mode did not run")?;
    ensure!(
        exit_status.check_succeeded(),
        "check mode exited abnormally: {exit_status:?}"
    );

    let catalogs = orchestrator.get_catalogs().await?;
    ensure!(
        !catalogs.is_empty(),
        "unable to locate schemas for the connection"
    );

    let found: BTreeSet<&str> = catalogs
        .iter()
        .map(|entry| entry.stream_name.as_str())
        .collect();
    let expected = registry.stream_names();
    ensure!(
        found == expected,
        "discovered schemas do not match: missing {:?}, unexpected {:?}",
        expected.difference(&found).collect::<Vec<_>>(),
        found.difference(&expected).collect::<Vec<_>>(),
    );

    info!(streams = catalogs.len(), "discovered schemas are OK");
    Ok(catalogs)
}

/// Select every stream in `catalogs`, with all fields or none.
///
/// When `select_all_fields` is false every property is explicitly
/// deselected, which leaves only the automatic fields replicating.
pub async fn select_all_streams_and_fields<O: Orchestrator + ?Sized>(
    orchestrator: &O,
    catalogs: &[CatalogEntry],
    select_all_fields: bool,
) -> anyhow::Result<()> {
    for entry in catalogs {
        let schema = orchestrator.get_annotated_schema(&entry.stream_id).await?;

        let deselected: BTreeSet<String> = if select_all_fields {
            BTreeSet::new()
        } else {
            schema.properties.keys().cloned().collect()
        };

        orchestrator
            .select_fields(entry, &schema, &deselected)
            .await
            .with_context(|| format!("selection failed for stream {}", entry.stream_name))?;
    }
    Ok(())
}

/// Verify the catalog reflects the requested table and field selection.
///
/// Streams outside `selected` must not be marked selected. For selected
/// streams, either every field is selected, or (with `select_all_fields`
/// false) exactly the automatic fields survive selection.
pub async fn verify_field_selection<O: Orchestrator + ?Sized>(
    orchestrator: &O,
    registry: &StreamRegistry,
    selected: &[CatalogEntry],
    select_all_fields: bool,
) -> anyhow::Result<()> {
    let expected_selected: BTreeSet<&str> = selected
        .iter()
        .map(|entry| entry.stream_name.as_str())
        .collect();

    for entry in orchestrator.get_catalogs().await? {
        let schema = orchestrator.get_annotated_schema(&entry.stream_id).await?;
        let stream_selected = schema.selected.unwrap_or(false);
        info!(
            stream = %entry.stream_name,
            selected = stream_selected,
            "validating stream selection"
        );

        if !expected_selected.contains(entry.stream_name.as_str()) {
            ensure!(
                !stream_selected,
                "stream {} selected, but not under test",
                entry.stream_name
            );
            continue;
        }
        ensure!(stream_selected, "stream {} not selected", entry.stream_name);

        if select_all_fields {
            for (field, props) in &schema.properties {
                ensure!(
                    props.selected.unwrap_or(false),
                    "field {}.{} not selected",
                    entry.stream_name,
                    field
                );
            }
        } else {
            let expected_automatic = registry.automatic_fields_of(&entry.stream_name)?;
            let selected_fields = selected_fields_from_metadata(&schema.metadata);
            ensure!(
                expected_automatic == selected_fields,
                "stream {}: expected only automatic fields {:?}, found {:?}",
                entry.stream_name,
                expected_automatic,
                selected_fields
            );
        }
    }
    Ok(())
}

/// Field names that survive selection: explicitly selected, or forced in
/// by `automatic` inclusion.
pub fn selected_fields_from_metadata(metadata: &[MetadataEntry]) -> BTreeSet<String> {
    metadata
        .iter()
        .filter(|entry| entry.breadcrumb.len() > 1)
        .filter(|entry| {
            entry.selected == Some(true) || entry.inclusion == Some(Inclusion::Automatic)
        })
        .filter_map(|entry| entry.breadcrumb.get(1).cloned())
        .collect()
}

/// Run a sync job, verify it exited cleanly, and return per-stream record
/// counts.
///
/// Fails if the sync replicated no data at all; per-stream expectations
/// are left to the calling scenario.
pub async fn verify_sync<O: Orchestrator + ?Sized>(
    orchestrator: &O,
    registry: &StreamRegistry,
) -> anyhow::Result<BTreeMap<String, u64>> {
    let exit_status = orchestrator
        .run_sync_mode()
        .await
        .context("sync did not run")?;
    ensure!(
        exit_status.sync_succeeded(),
        "sync exited abnormally: {exit_status:?}"
    );

    let streams: BTreeSet<String> = registry
        .stream_names()
        .into_iter()
        .map(String::from)
        .collect();
    let record_counts = orchestrator
        .get_record_counts(&streams, &registry.expected_primary_keys())
        .await?;

    let total: u64 = record_counts.values().sum();
    ensure!(total > 0, "failed to replicate any data: {record_counts:?}");
    info!(total, "replicated row count");

    Ok(record_counts)
}
