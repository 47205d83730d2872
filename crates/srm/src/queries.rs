//! Source store query shapes
//!
//! The SRM collections mark every document with a `k` discriminator; these
//! helpers compose the [`Query`] values the pipeline runs against each
//! collection. Building a query is pure, so the shapes are directly
//! testable without a store.

use logsift_docstore::{Document, Query};

/// Discriminator for resource manager session start markers
pub const KIND_START: &str = "srm.start";

/// Discriminator for the limits context attached to a session start
pub const KIND_LIMITS: &str = "srm.limits";

/// Discriminator for CPU utilization samples
pub const KIND_CPU: &str = "srm.cpu";

/// Discriminator for memory utilization samples
pub const KIND_MEMORY: &str = "srm.mem";

/// Discriminator for limit-enforcement actions
pub const KIND_ACTION: &str = "srm.action";

/// All documents carrying a worker index; used to enumerate workers.
pub fn workers() -> Query {
    Query::new().exists("worker")
}

/// All documents of one worker carrying a pid; used to enumerate pids.
pub fn pids(worker: u32) -> Query {
    Query::new().eq("worker", u64::from(worker)).exists("pid")
}

/// Session start markers for one worker.
pub fn start_markers(worker: u32) -> Query {
    Query::new()
        .eq("k", KIND_START)
        .eq("worker", u64::from(worker))
}

/// The limits context belonging to a start marker: same worker and pid, at
/// or after the marker's timestamp. Returns `None` when the marker lacks the
/// fields needed to anchor the lookup.
pub fn threshold_context(worker: u32, start: &Document) -> Option<Query> {
    let pid = start.pid()?;
    let since = start.ts()?;
    Some(
        Query::new()
            .eq("k", KIND_LIMITS)
            .eq("worker", u64::from(worker))
            .eq("pid", u64::from(pid))
            .ts_since(since),
    )
}

/// CPU samples for one worker process.
pub fn cpu_samples(worker: u32, pid: u32) -> Query {
    samples(KIND_CPU, worker, pid)
}

/// Memory samples for one worker process.
pub fn memory_samples(worker: u32, pid: u32) -> Query {
    samples(KIND_MEMORY, worker, pid)
}

/// Enforcement actions for one worker process.
pub fn actions(worker: u32, pid: u32) -> Query {
    samples(KIND_ACTION, worker, pid)
}

fn samples(kind: &'static str, worker: u32, pid: u32) -> Query {
    Query::new()
        .eq("k", kind)
        .eq("worker", u64::from(worker))
        .eq("pid", u64::from(pid))
}

#[cfg(test)]
#[path = "queries_test.rs"]
mod queries_test;
