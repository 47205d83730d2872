//! Persister configuration
//!
//! Every bound here is explicit: the buffer is never unbounded and retries
//! are never unlimited.

use std::time::Duration;

/// Default bounded-buffer capacity (records)
pub const DEFAULT_QUEUE_SIZE: usize = 1024;

/// Default batch size (records per destination write)
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default flush interval for partially filled batches
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(500);

/// Default retry attempts for a failed batch write
pub const DEFAULT_RETRY_ATTEMPTS: usize = 3;

/// Configuration for [`crate::ConcurrentPersister`]
#[derive(Debug, Clone)]
pub struct PersisterConfig {
    /// Bounded-buffer capacity; `enqueue` blocks when full
    pub queue_size: usize,

    /// Records accumulated before a destination write
    pub batch_size: usize,

    /// Flush partially filled batches at this interval
    pub flush_interval: Duration,

    /// Retry attempts before a write failure becomes fatal
    pub retry_attempts: usize,

    /// Base delay for exponential backoff
    pub retry_base_delay: Duration,

    /// Maximum backoff delay
    pub retry_max_delay: Duration,
}

impl Default for PersisterConfig {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay: Duration::from_millis(100),
            retry_max_delay: Duration::from_secs(10),
        }
    }
}

impl PersisterConfig {
    /// Set the bounded-buffer capacity
    pub fn with_queue_size(mut self, size: usize) -> Self {
        self.queue_size = size.max(1);
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the flush interval
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set the retry bound
    pub fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Set the backoff base delay
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}
