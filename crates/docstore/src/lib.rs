//! Logsift - Document store
//!
//! Read-only access to the named document collections of a parsed logset.
//! Extraction pipelines enumerate entities and fetch raw documents through
//! the [`DocumentStore`] trait; they never write back.
//!
//! # Architecture
//!
//! ```text
//! [Pipeline] --Query--> [DocumentStore] --> ordered Vec<Document>
//! ```
//!
//! Enumeration is deterministic: distinct values come back as an ascending
//! set and `find` results are ordered by document timestamp, so reruns visit
//! the same data in the same sequence. Because no writes occur, a store may
//! be shared across concurrent pipeline runs without coordination.

/// Raw document wrapper with typed field accessors
pub mod document;

/// Store errors
pub mod error;

/// In-process store implementation
pub mod memory;

/// Typed query predicates
pub mod query;

/// The read-only store trait
pub mod store;

pub use document::Document;
pub use error::StoreError;
pub use memory::{MemoryStore, MemoryStoreBuilder};
pub use query::Query;
pub use store::DocumentStore;
