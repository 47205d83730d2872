//! Persistence errors

use thiserror::Error;

/// Destination schema creation/migration errors. Always fatal to a run and
/// raised before any record write is attempted.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The destination could not be reached at all
    #[error("destination unreachable: {0}")]
    Unreachable(String),

    /// A DDL statement failed against an existing or new table
    #[error("schema statement failed for table '{table}': {reason}")]
    Statement { table: String, reason: String },
}

impl SchemaError {
    /// Create an unreachable error
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::Unreachable(msg.into())
    }

    /// Create a statement error
    pub fn statement(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Statement {
            table: table.into(),
            reason: reason.into(),
        }
    }
}

/// One failed destination write. Destinations should name the table and the
/// underlying cause in the message.
#[derive(Debug, Error)]
#[error("write failed: {0}")]
pub struct WriteError(String);

impl WriteError {
    /// Create a write error
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Fatal persister errors.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Schema management failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A batch write failed permanently after bounded retries
    #[error("batch write failed after {attempts} attempts: {source}")]
    WriteFailed {
        attempts: usize,
        #[source]
        source: WriteError,
    },

    /// The record channel closed before shutdown (the writer task stopped
    /// early; its error surfaces from `shutdown`)
    #[error("persister is no longer accepting records")]
    ChannelClosed,

    /// The writer task panicked
    #[error("persister writer task panicked")]
    WriterPanicked,
}
