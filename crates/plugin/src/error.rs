//! Plugin error taxonomy
//!
//! Fatal failure classes for a plugin run. Non-fatal conditions (skipped
//! documents, zero records produced) never surface here; they are carried on
//! [`crate::PluginResponse`].

use thiserror::Error;

/// Fatal errors a plugin run can report to the host.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Destination table creation or migration failed before extraction began
    #[error("schema management failed: {0}")]
    Schema(String),

    /// The source document store was unreachable or returned an error
    #[error("source store error: {0}")]
    Source(String),

    /// A destination write permanently failed after bounded retries
    #[error("persistence failed: {0}")]
    Persist(String),
}

impl PluginError {
    /// Create a schema error
    pub fn schema(msg: impl std::fmt::Display) -> Self {
        Self::Schema(msg.to_string())
    }

    /// Create a source store error
    pub fn source(msg: impl std::fmt::Display) -> Self {
        Self::Source(msg.to_string())
    }

    /// Create a persistence error
    pub fn persist(msg: impl std::fmt::Display) -> Self {
        Self::Persist(msg.to_string())
    }
}
