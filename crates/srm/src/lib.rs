//! Logsift - Server resource manager plugin
//!
//! Extracts server-resource-manager telemetry from a parsed logset and
//! persists a relational projection of it for reporting.
//!
//! # Data flow
//!
//! ```text
//! [DocumentStore] --raw documents--> [extract] --typed records-->
//!     [ConcurrentPersister] --batched rows--> [ClickHouse]
//! ```
//!
//! For each source collection the pipeline enumerates worker indexes in
//! ascending order, derives the configured resource [`model::Threshold`]s
//! from start markers, then walks each worker's process ids and derives
//! CPU samples, memory samples, and limit-enforcement actions. Records flow
//! through a bounded persister that drains on shutdown, and the run reports
//! whether any data was produced.

/// ClickHouse destination for SRM records
pub mod destination;

/// Document-to-record extraction
pub mod extract;

/// Typed telemetry records
pub mod model;

/// The extraction pipeline and plugin implementation
pub mod pipeline;

/// Source store query shapes
pub mod queries;

/// Destination row types and DDL
pub mod tables;

pub use destination::{SrmDestination, SrmDestinationConfig};
pub use extract::ExtractWarning;
pub use model::{ActionEvent, ActionKind, CpuInfo, MemoryInfo, RecordKind, SrmRecord, Threshold};
pub use pipeline::ResourceManagerPlugin;
