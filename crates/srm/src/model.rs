//! Typed server resource manager records
//!
//! These are the transient values the pipeline derives from raw documents
//! and hands to the persister. Each carries the logset identity of the run
//! that produced it; none survive past enqueueing.

use chrono::{DateTime, Utc};
use logsift_plugin::LogsetId;

/// Destination table routing for one record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    CpuInfo,
    MemoryInfo,
    Action,
    Threshold,
}

impl RecordKind {
    /// Every kind, in table-creation order.
    pub const ALL: [RecordKind; 4] = [
        RecordKind::CpuInfo,
        RecordKind::MemoryInfo,
        RecordKind::Action,
        RecordKind::Threshold,
    ];

    /// Destination table name for this kind.
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::CpuInfo => "srm_cpu_info",
            RecordKind::MemoryInfo => "srm_memory_info",
            RecordKind::Action => "srm_action",
            RecordKind::Threshold => "srm_threshold",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// One CPU utilization sample for a worker process.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuInfo {
    pub logset: LogsetId,
    pub worker: u32,
    pub pid: u32,
    pub timestamp: DateTime<Utc>,
    /// Utilization of the sampled process, percent
    pub process_util: u16,
    /// Utilization across all processes on the machine, percent
    pub total_util: u16,
}

/// One memory utilization sample for a worker process.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryInfo {
    pub logset: LogsetId,
    pub worker: u32,
    pub pid: u32,
    pub timestamp: DateTime<Utc>,
    /// Bytes used by the sampled process
    pub process_bytes: u64,
    /// Bytes used across all processes on the machine
    pub total_bytes: u64,
}

/// Why the resource manager acted against a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// The process exceeded its CPU limit
    CpuLimitExceeded,
    /// The process (or the machine) exceeded a memory limit
    MemoryLimitExceeded,
}

impl ActionKind {
    /// Stable string form used in the destination rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CpuLimitExceeded => "cpu_exceeded",
            ActionKind::MemoryLimitExceeded => "memory_exceeded",
        }
    }

    /// Parse the document discriminator.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cpu_exceeded" => Some(ActionKind::CpuLimitExceeded),
            "memory_exceeded" => Some(ActionKind::MemoryLimitExceeded),
            _ => None,
        }
    }
}

/// One enforcement action the resource manager took.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub logset: LogsetId,
    pub worker: u32,
    pub pid: u32,
    pub timestamp: DateTime<Utc>,
    pub kind: ActionKind,
    /// CPU utilization at enforcement time, percent (CPU actions)
    pub cpu_util: Option<u16>,
    /// Process memory at enforcement time, bytes (memory actions)
    pub process_bytes: Option<u64>,
    /// Total memory at enforcement time, bytes (memory actions)
    pub total_bytes: Option<u64>,
}

/// Configured resource limits announced at a resource manager session start.
///
/// Derived only from a start marker plus its limits context document; one
/// threshold may bound zero or more subsequent events.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub logset: LogsetId,
    pub worker: u32,
    pub pid: u32,
    /// Timestamp of the start marker the threshold belongs to
    pub timestamp: DateTime<Utc>,
    /// CPU utilization limit, percent
    pub cpu_limit: u16,
    /// Per-process memory limit, bytes
    pub process_memory_limit: u64,
    /// Total machine memory limit, bytes
    pub total_memory_limit: u64,
}

/// Any record the pipeline persists.
#[derive(Debug, Clone, PartialEq)]
pub enum SrmRecord {
    Cpu(CpuInfo),
    Memory(MemoryInfo),
    Action(ActionEvent),
    Threshold(Threshold),
}

impl SrmRecord {
    /// Destination routing for this record.
    pub fn kind(&self) -> RecordKind {
        match self {
            SrmRecord::Cpu(_) => RecordKind::CpuInfo,
            SrmRecord::Memory(_) => RecordKind::MemoryInfo,
            SrmRecord::Action(_) => RecordKind::Action,
            SrmRecord::Threshold(_) => RecordKind::Threshold,
        }
    }

    /// Worker index the record belongs to.
    pub fn worker(&self) -> u32 {
        match self {
            SrmRecord::Cpu(r) => r.worker,
            SrmRecord::Memory(r) => r.worker,
            SrmRecord::Action(r) => r.worker,
            SrmRecord::Threshold(r) => r.worker,
        }
    }

    /// Process id the record belongs to.
    pub fn pid(&self) -> u32 {
        match self {
            SrmRecord::Cpu(r) => r.pid,
            SrmRecord::Memory(r) => r.pid,
            SrmRecord::Action(r) => r.pid,
            SrmRecord::Threshold(r) => r.pid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_kinds_route_to_distinct_tables() {
        let tables: std::collections::BTreeSet<_> =
            RecordKind::ALL.iter().map(|k| k.table()).collect();
        assert_eq!(tables.len(), RecordKind::ALL.len());
    }

    #[test]
    fn action_kind_round_trips() {
        for kind in [ActionKind::CpuLimitExceeded, ActionKind::MemoryLimitExceeded] {
            assert_eq!(ActionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::parse("oom"), None);
    }
}
