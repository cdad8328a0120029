//! Expected stream metadata for the ActiveCampaign tap.
//!
//! This crate is the single source of truth for every stream's replication
//! contract: primary keys, replication method, replication (bookmark) keys,
//! and whether the stream honors the configured start date. The harness
//! compares discovered catalogs, field selection, and sync output against
//! these expectations.
//!
//! # Example
//!
//! ```rust
//! use stream_meta::StreamRegistry;
//!
//! let registry = StreamRegistry::activecampaign();
//! let fields = registry.automatic_fields_of("accounts").unwrap();
//! assert!(fields.contains("id"));
//! assert!(fields.contains("updated_timestamp"));
//! ```

pub mod registry;
pub mod streams;

// Re-exports for convenience
pub use registry::{MetadataError, StreamRegistry};
pub use streams::{ReplicationMethod, StreamSpec};
