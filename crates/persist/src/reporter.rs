//! Periodic status reporting
//!
//! [`StatusReporter`] collects [`ProgressProvider`] snapshots on an interval
//! and emits them through `tracing`, so an operator can watch a long
//! extraction drain without the persister knowing anything about
//! presentation. The surrounding run cancels the reporter once the persister
//! has shut down; a final snapshot is logged on the way out.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::progress::ProgressProvider;

/// Default reporting interval
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Interval logger for persister progress.
pub struct StatusReporter {
    interval: Duration,
    providers: Vec<Arc<dyn ProgressProvider>>,
}

impl StatusReporter {
    /// Create a reporter with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            providers: Vec::new(),
        }
    }

    /// Register a progress provider.
    pub fn provider(mut self, provider: Arc<dyn ProgressProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Log snapshots until `cancel` fires, then log one final snapshot.
    pub async fn run(self, cancel: CancellationToken) {
        let mut tick = tokio::time::interval(self.interval);
        // The first tick completes immediately; skip it so the opening
        // snapshot is not all zeros.
        tick.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tick.tick() => self.report(),
            }
        }

        self.report();
    }

    fn report(&self) {
        for provider in &self.providers {
            let snapshot = provider.snapshot();
            info!(
                component = provider.component(),
                enqueued = snapshot.enqueued,
                committed = snapshot.committed,
                batches = snapshot.batches_written,
                retries = snapshot.retries,
                write_errors = snapshot.write_errors,
                "persister progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{PersisterProgress, ProgressHandle};

    #[tokio::test]
    async fn test_reporter_stops_on_cancellation() {
        let progress = Arc::new(PersisterProgress::new());
        progress.record_batch(3);

        let reporter = StatusReporter::new(Duration::from_millis(5))
            .provider(Arc::new(ProgressHandle::new("test", progress)));

        let cancel = CancellationToken::new();
        let task = tokio::spawn(reporter.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        // Must terminate promptly once cancelled.
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("reporter did not stop")
            .expect("reporter panicked");
    }

    #[tokio::test]
    async fn test_reporter_without_providers_is_harmless() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        StatusReporter::new(Duration::from_millis(5)).run(cancel).await;
    }
}
