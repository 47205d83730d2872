//! Logsift - Persistence layer
//!
//! Decouples record production from destination writes. A pipeline enqueues
//! typed records through a bounded channel; a background writer task batches
//! them and writes to the destination, retrying transient failures a bounded
//! number of times:
//!
//! ```text
//! [Pipeline] --enqueue--> [bounded channel] --> [writer task] --> [Destination]
//!                                                   |
//!                                            per-batch retry,
//!                                            progress counters
//! ```
//!
//! # Guarantees
//!
//! - `enqueue` applies backpressure when the buffer is full; it never drops
//!   a record silently.
//! - `shutdown` drains: every enqueued record is written, or the run reports
//!   a fatal write error. At-least-once delivery; duplicates are possible
//!   under retry, losses are not.
//! - [`SchemaManager`] runs before any write and is idempotent.
//!
//! Progress is observable through [`ProgressProvider`] handles consumed by a
//! [`StatusReporter`], keeping presentation out of the write path.

/// Persister tuning knobs
pub mod config;

/// Destination trait and the in-process implementation
pub mod destination;

/// Error types
pub mod error;

/// The bounded concurrent persister
pub mod persister;

/// Atomic progress counters
pub mod progress;

/// Periodic progress logging
pub mod reporter;

/// Idempotent destination schema management
pub mod schema;

pub use config::PersisterConfig;
pub use destination::{Destination, MemoryDestination};
pub use error::{PersistError, SchemaError, WriteError};
pub use persister::{ConcurrentPersister, DrainSummary, PersisterHandle};
pub use progress::{PersisterProgress, ProgressHandle, ProgressProvider, ProgressSnapshot};
pub use reporter::StatusReporter;
pub use schema::{SchemaExecutor, SchemaManager, TableSpec};
