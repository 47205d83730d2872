//! Concurrent bounded persister
//!
//! One producer enqueues records through a bounded channel; one background
//! writer task batches them and writes to the destination. Backpressure is
//! the channel bound: when the destination is slower than extraction,
//! `enqueue` suspends instead of growing memory.
//!
//! Shutdown closes the channel and waits for the writer to drain, so by the
//! time `shutdown` returns every record has been committed or the run has a
//! fatal write error to report.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PersisterConfig;
use crate::destination::Destination;
use crate::error::{PersistError, WriteError};
use crate::progress::{PersisterProgress, ProgressHandle};

/// Cloneable producer handle for a running persister.
///
/// All clones share the same bounded channel; the persister drains only
/// after every handle has been dropped, so producers must release their
/// handles before awaiting [`ConcurrentPersister::shutdown`].
#[derive(Debug)]
pub struct PersisterHandle<R> {
    sender: mpsc::Sender<R>,
    progress: Arc<PersisterProgress>,
}

impl<R> Clone for PersisterHandle<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            progress: Arc::clone(&self.progress),
        }
    }
}

impl<R: Send + 'static> PersisterHandle<R> {
    /// Hand one record to the persister.
    ///
    /// Suspends while the buffer is at capacity (backpressure). Fails only
    /// when the writer task has already stopped; the underlying cause is
    /// reported by `shutdown`.
    pub async fn enqueue(&self, record: R) -> Result<(), PersistError> {
        self.sender
            .send(record)
            .await
            .map_err(|_| PersistError::ChannelClosed)?;
        self.progress.record_enqueued();
        Ok(())
    }
}

/// Aggregate outcome of a drained persister run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainSummary {
    /// Records committed to the destination
    pub records_committed: u64,

    /// Batches written
    pub batches_written: u64,

    /// Retry attempts performed
    pub retries: u64,
}

/// Bounded, drain-on-shutdown writer for one destination.
pub struct ConcurrentPersister<D: Destination> {
    sender: mpsc::Sender<D::Record>,
    writer: JoinHandle<Result<(), PersistError>>,
    progress: Arc<PersisterProgress>,
}

impl<D: Destination> ConcurrentPersister<D> {
    /// Spawn the writer task and return the running persister.
    ///
    /// The persister takes exclusive ownership of `destination` for the
    /// run; no other component may write to the same tables concurrently.
    pub fn spawn(destination: D, config: PersisterConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_size);
        let progress = Arc::new(PersisterProgress::new());
        let writer = tokio::spawn(write_loop(
            destination,
            receiver,
            config,
            Arc::clone(&progress),
        ));
        Self {
            sender,
            writer,
            progress,
        }
    }

    /// A producer handle into this persister.
    pub fn handle(&self) -> PersisterHandle<D::Record> {
        PersisterHandle {
            sender: self.sender.clone(),
            progress: Arc::clone(&self.progress),
        }
    }

    /// Records committed so far. Monotonically increasing.
    pub fn committed(&self) -> u64 {
        self.progress.committed()
    }

    /// Named progress handle for status reporting.
    pub fn progress_handle(&self, component: impl Into<String>) -> ProgressHandle {
        ProgressHandle::new(component, Arc::clone(&self.progress))
    }

    /// Close the channel and wait for the writer to drain.
    ///
    /// Call exactly once per run, on both the success and failure paths of
    /// extraction, after dropping any outstanding [`PersisterHandle`]s.
    /// Returns once every buffered record has been written, or with the
    /// fatal error that stopped the writer.
    pub async fn shutdown(self) -> Result<DrainSummary, PersistError> {
        let Self {
            sender,
            writer,
            progress,
        } = self;
        drop(sender);

        match writer.await {
            Ok(Ok(())) => {
                let snapshot = progress.snapshot();
                Ok(DrainSummary {
                    records_committed: snapshot.committed,
                    batches_written: snapshot.batches_written,
                    retries: snapshot.retries,
                })
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PersistError::WriterPanicked),
        }
    }
}

/// Writer task: batch, flush on size or interval, final flush on close.
async fn write_loop<D: Destination>(
    destination: D,
    mut receiver: mpsc::Receiver<D::Record>,
    config: PersisterConfig,
    progress: Arc<PersisterProgress>,
) -> Result<(), PersistError> {
    let mut batch: Vec<D::Record> = Vec::with_capacity(config.batch_size);
    let mut flush_tick = tokio::time::interval(config.flush_interval);

    loop {
        tokio::select! {
            maybe_record = receiver.recv() => {
                match maybe_record {
                    Some(record) => {
                        batch.push(record);
                        if batch.len() >= config.batch_size {
                            flush(&destination, &mut batch, &config, &progress).await?;
                        }
                    }
                    // Channel closed: all producers dropped, drain below.
                    None => break,
                }
            }
            _ = flush_tick.tick() => {
                if !batch.is_empty() {
                    flush(&destination, &mut batch, &config, &progress).await?;
                }
            }
        }
    }

    if !batch.is_empty() {
        flush(&destination, &mut batch, &config, &progress).await?;
    }

    tracing::debug!(
        committed = progress.committed(),
        "persister writer drained"
    );
    Ok(())
}

/// Write one batch with bounded exponential-backoff retry.
async fn flush<D: Destination>(
    destination: &D,
    batch: &mut Vec<D::Record>,
    config: &PersisterConfig,
    progress: &PersisterProgress,
) -> Result<(), PersistError> {
    let records = std::mem::take(batch);
    batch.reserve(config.batch_size);

    let mut delay = config.retry_base_delay;

    for attempt in 0..=config.retry_attempts {
        if attempt > 0 {
            progress.record_retry();
            tracing::warn!(
                attempt,
                max_attempts = config.retry_attempts,
                delay_ms = delay.as_millis() as u64,
                "retrying batch write"
            );
            tokio::time::sleep(delay).await;
            delay = std::cmp::min(delay * 2, config.retry_max_delay);
        }

        match destination.write_batch(&records).await {
            Ok(written) => {
                progress.record_batch(written as u64);
                tracing::debug!(records = written, "flushed batch");
                return Ok(());
            }
            Err(e) if attempt < config.retry_attempts => {
                progress.record_write_error();
                tracing::warn!(error = %e, attempt, "batch write failed, will retry");
            }
            Err(e) => {
                progress.record_write_error();
                tracing::error!(
                    error = %e,
                    attempts = config.retry_attempts + 1,
                    records = records.len(),
                    "batch write failed permanently"
                );
                return Err(PersistError::WriteFailed {
                    attempts: config.retry_attempts + 1,
                    source: e,
                });
            }
        }
    }

    Err(PersistError::WriteFailed {
        attempts: config.retry_attempts + 1,
        source: WriteError::new("max retries exceeded"),
    })
}

#[cfg(test)]
#[path = "persister_test.rs"]
mod persister_test;
