//! Destination trait
//!
//! A [`Destination`] owns the connection(s) to one relational sink and knows
//! how to create its tables and write batches of one record type. The
//! persister is the destination's only caller during a run.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{SchemaError, WriteError};

/// A relational sink for one record type.
pub trait Destination: Send + Sync + 'static {
    /// Record type this destination accepts
    type Record: Send + 'static;

    /// Create or migrate the destination tables. Idempotent; must succeed
    /// before any `write_batch` call is issued.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), SchemaError>> + Send;

    /// Write one batch, returning the number of records committed.
    ///
    /// Writes may be re-issued after a transient failure, so implementations
    /// must tolerate duplicates (at-least-once delivery).
    fn write_batch(
        &self,
        records: &[Self::Record],
    ) -> impl Future<Output = Result<usize, WriteError>> + Send;
}

/// In-process destination that appends records to a vector.
///
/// Stands in for a real database during tests, benchmarks, and dry runs,
/// the same role the pipeline's null sink plays elsewhere.
#[derive(Debug)]
pub struct MemoryDestination<R> {
    inner: Arc<Inner<R>>,
}

#[derive(Debug)]
struct Inner<R> {
    rows: Mutex<Vec<R>>,
    schema_calls: AtomicU64,
    write_calls: AtomicU64,
}

impl<R> Clone for MemoryDestination<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> Default for MemoryDestination<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> MemoryDestination<R> {
    /// Create an empty destination
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                rows: Mutex::new(Vec::new()),
                schema_calls: AtomicU64::new(0),
                write_calls: AtomicU64::new(0),
            }),
        }
    }

    /// Times `ensure_schema` has been called
    pub fn schema_calls(&self) -> u64 {
        self.inner.schema_calls.load(Ordering::Relaxed)
    }

    /// Times `write_batch` has been called
    pub fn write_calls(&self) -> u64 {
        self.inner.write_calls.load(Ordering::Relaxed)
    }
}

impl<R: Clone> MemoryDestination<R> {
    /// Copy of everything written so far
    pub fn rows(&self) -> Vec<R> {
        self.inner
            .rows
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }
}

impl<R: Clone + Send + Sync + 'static> Destination for MemoryDestination<R> {
    type Record = R;

    async fn ensure_schema(&self) -> Result<(), SchemaError> {
        self.inner.schema_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn write_batch(&self, records: &[R]) -> Result<usize, WriteError> {
        self.inner.write_calls.fetch_add(1, Ordering::Relaxed);
        let mut rows = self
            .inner
            .rows
            .lock()
            .map_err(|_| WriteError::new("memory destination poisoned"))?;
        rows.extend_from_slice(records);
        Ok(records.len())
    }
}
