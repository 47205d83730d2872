//! Document store errors

use thiserror::Error;

/// Errors from a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached; fatal to a pipeline run
    #[error("source store unavailable: {0}")]
    Unavailable(String),

    /// The store returned a record it could not represent as a document
    #[error("malformed document in collection '{collection}': {reason}")]
    Malformed { collection: String, reason: String },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a malformed-document error
    pub fn malformed(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}
