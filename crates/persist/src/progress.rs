//! Persister progress counters
//!
//! Atomic counters updated from the enqueue and write paths, snapshotted by
//! observers. The committed count is monotonically increasing; orchestrators
//! use it to decide whether a run produced data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// Counters
// =============================================================================

/// Progress counters for one persister.
#[derive(Debug, Default)]
pub struct PersisterProgress {
    /// Records accepted by `enqueue`
    pub enqueued: AtomicU64,

    /// Records committed to the destination
    pub committed: AtomicU64,

    /// Batches successfully written
    pub batches_written: AtomicU64,

    /// Retry attempts performed
    pub retries: AtomicU64,

    /// Batch writes that failed (including attempts that later succeeded)
    pub write_errors: AtomicU64,
}

impl PersisterProgress {
    /// Create counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            committed: AtomicU64::new(0),
            batches_written: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
        }
    }

    /// Record an accepted record
    #[inline]
    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a committed batch of `records` records
    #[inline]
    pub fn record_batch(&self, records: u64) {
        self.committed.fetch_add(records, Ordering::Relaxed);
        self.batches_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a retry attempt
    #[inline]
    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed batch write
    #[inline]
    pub fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records committed so far. Monotonically increasing.
    #[inline]
    pub fn committed(&self) -> u64 {
        self.committed.load(Ordering::Relaxed)
    }

    /// Snapshot all counters
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of persister progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProgressSnapshot {
    pub enqueued: u64,
    pub committed: u64,
    pub batches_written: u64,
    pub retries: u64,
    pub write_errors: u64,
}

// =============================================================================
// Observation
// =============================================================================

/// Trait for components that expose persister progress to a reporter.
///
/// Keeps status presentation decoupled from persister internals: the
/// reporter only ever sees snapshots.
pub trait ProgressProvider: Send + Sync {
    /// Component name used in status output
    fn component(&self) -> &str;

    /// Current counter values
    fn snapshot(&self) -> ProgressSnapshot;
}

/// Named handle pairing a component id with shared progress counters.
///
/// Remains valid after the persister itself has been consumed by shutdown.
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    component: String,
    progress: Arc<PersisterProgress>,
}

impl ProgressHandle {
    /// Create a handle over shared counters
    pub fn new(component: impl Into<String>, progress: Arc<PersisterProgress>) -> Self {
        Self {
            component: component.into(),
            progress,
        }
    }
}

impl ProgressProvider for ProgressHandle {
    fn component(&self) -> &str {
        &self.component
    }

    fn snapshot(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let progress = PersisterProgress::new();
        progress.record_enqueued();
        progress.record_enqueued();
        progress.record_batch(2);
        progress.record_retry();
        progress.record_write_error();

        let snapshot = progress.snapshot();
        assert_eq!(snapshot.enqueued, 2);
        assert_eq!(snapshot.committed, 2);
        assert_eq!(snapshot.batches_written, 1);
        assert_eq!(snapshot.retries, 1);
        assert_eq!(snapshot.write_errors, 1);
    }

    #[test]
    fn committed_is_monotonic() {
        let progress = PersisterProgress::new();
        let mut last = 0;
        for batch in [3u64, 1, 7] {
            progress.record_batch(batch);
            let committed = progress.committed();
            assert!(committed >= last);
            last = committed;
        }
        assert_eq!(last, 11);
    }

    #[test]
    fn handle_reports_component_and_snapshot() {
        let progress = Arc::new(PersisterProgress::new());
        progress.record_batch(5);

        let handle = ProgressHandle::new("resource-manager", Arc::clone(&progress));
        assert_eq!(handle.component(), "resource-manager");
        assert_eq!(handle.snapshot().committed, 5);
    }
}
