//! Verification harness for the ActiveCampaign tap.
//!
//! Drives a record-extraction connector through discovery ("check mode"),
//! catalog and field selection, and data syncs via an external test
//! orchestrator, asserting the emitted catalogs, field selection, record
//! counts, and persisted bookmark state match the expected replication
//! contracts.
//!
//! # Architecture
//!
//! - `stream-meta` crate - expected per-stream replication contracts
//! - `bookmark` crate - bookmark-state parsing, normalization, and the
//!   calculated-state logic for second-sync verification
//! - [`config`] - connection credentials and the configured start date
//! - [`orchestrator`] - trait seam for the external orchestration service
//! - [`verify`] - the check/selection/sync verification flows
//! - [`testing`] - deterministic in-memory orchestrator for the harness's
//!   own test suite
//!
//! # Example
//!
//! ```rust,ignore
//! use stream_meta::StreamRegistry;
//! use tap_activecampaign_verify::verify;
//!
//! let registry = StreamRegistry::activecampaign();
//! let catalogs = verify::verify_check_mode(&orchestrator, &registry).await?;
//! verify::select_all_streams_and_fields(&orchestrator, &catalogs, true).await?;
//! let counts = verify::verify_sync(&orchestrator, &registry).await?;
//! ```

pub mod config;
pub mod orchestrator;
pub mod testing;
pub mod verify;

pub use config::{ConfigError, TapConfig};
pub use orchestrator::{
    AnnotatedSchema, CatalogEntry, ExitStatus, FieldProperties, Inclusion, MetadataEntry,
    Orchestrator,
};
