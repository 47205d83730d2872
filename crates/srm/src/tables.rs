//! Destination row types and DDL
//!
//! One table per record kind. Row structs mirror the column order of the
//! CREATE statements; [`table_specs`] feeds the schema manager the expected
//! column sets so older tables can be migrated in place.

use clickhouse::Row;
use logsift_persist::TableSpec;
use serde::Serialize;
use uuid::Uuid;

use crate::model::{ActionEvent, CpuInfo, MemoryInfo, Threshold};

/// Row for the `srm_cpu_info` table
///
/// ```sql
/// CREATE TABLE srm_cpu_info (
///     logset_id UUID,
///     worker UInt32,
///     pid UInt32,
///     timestamp DateTime64(3),
///     process_util UInt16,
///     total_util UInt16
/// ) ENGINE = MergeTree()
/// ORDER BY (logset_id, worker, pid, timestamp);
/// ```
#[derive(Debug, Clone, Row, Serialize)]
pub struct CpuInfoRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub logset_id: Uuid,
    pub worker: u32,
    pub pid: u32,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub process_util: u16,
    pub total_util: u16,
}

impl From<&CpuInfo> for CpuInfoRow {
    fn from(info: &CpuInfo) -> Self {
        Self {
            logset_id: info.logset.as_uuid(),
            worker: info.worker,
            pid: info.pid,
            timestamp: info.timestamp.timestamp_millis(),
            process_util: info.process_util,
            total_util: info.total_util,
        }
    }
}

/// Row for the `srm_memory_info` table
#[derive(Debug, Clone, Row, Serialize)]
pub struct MemoryInfoRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub logset_id: Uuid,
    pub worker: u32,
    pub pid: u32,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub process_bytes: u64,
    pub total_bytes: u64,
}

impl From<&MemoryInfo> for MemoryInfoRow {
    fn from(info: &MemoryInfo) -> Self {
        Self {
            logset_id: info.logset.as_uuid(),
            worker: info.worker,
            pid: info.pid,
            timestamp: info.timestamp.timestamp_millis(),
            process_bytes: info.process_bytes,
            total_bytes: info.total_bytes,
        }
    }
}

/// Row for the `srm_action` table
#[derive(Debug, Clone, Row, Serialize)]
pub struct ActionRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub logset_id: Uuid,
    pub worker: u32,
    pub pid: u32,
    /// Epoch milliseconds
    pub timestamp: i64,
    /// Stable action discriminator ("cpu_exceeded", "memory_exceeded")
    pub action: String,
    pub cpu_util: Option<u16>,
    pub process_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
}

impl From<&ActionEvent> for ActionRow {
    fn from(event: &ActionEvent) -> Self {
        Self {
            logset_id: event.logset.as_uuid(),
            worker: event.worker,
            pid: event.pid,
            timestamp: event.timestamp.timestamp_millis(),
            action: event.kind.as_str().to_string(),
            cpu_util: event.cpu_util,
            process_bytes: event.process_bytes,
            total_bytes: event.total_bytes,
        }
    }
}

/// Row for the `srm_threshold` table
#[derive(Debug, Clone, Row, Serialize)]
pub struct ThresholdRow {
    #[serde(with = "clickhouse::serde::uuid")]
    pub logset_id: Uuid,
    pub worker: u32,
    pub pid: u32,
    /// Epoch milliseconds of the session start marker
    pub timestamp: i64,
    pub cpu_limit: u16,
    pub process_memory_limit: u64,
    pub total_memory_limit: u64,
}

impl From<&Threshold> for ThresholdRow {
    fn from(threshold: &Threshold) -> Self {
        Self {
            logset_id: threshold.logset.as_uuid(),
            worker: threshold.worker,
            pid: threshold.pid,
            timestamp: threshold.timestamp.timestamp_millis(),
            cpu_limit: threshold.cpu_limit,
            process_memory_limit: threshold.process_memory_limit,
            total_memory_limit: threshold.total_memory_limit,
        }
    }
}

const CREATE_CPU_INFO: &str = r#"CREATE TABLE IF NOT EXISTS srm_cpu_info (
    logset_id UUID,
    worker UInt32,
    pid UInt32,
    timestamp DateTime64(3),
    process_util UInt16,
    total_util UInt16
) ENGINE = MergeTree()
PARTITION BY toYYYYMM(timestamp)
ORDER BY (logset_id, worker, pid, timestamp)"#;

const CREATE_MEMORY_INFO: &str = r#"CREATE TABLE IF NOT EXISTS srm_memory_info (
    logset_id UUID,
    worker UInt32,
    pid UInt32,
    timestamp DateTime64(3),
    process_bytes UInt64,
    total_bytes UInt64
) ENGINE = MergeTree()
PARTITION BY toYYYYMM(timestamp)
ORDER BY (logset_id, worker, pid, timestamp)"#;

const CREATE_ACTION: &str = r#"CREATE TABLE IF NOT EXISTS srm_action (
    logset_id UUID,
    worker UInt32,
    pid UInt32,
    timestamp DateTime64(3),
    action LowCardinality(String),
    cpu_util Nullable(UInt16),
    process_bytes Nullable(UInt64),
    total_bytes Nullable(UInt64)
) ENGINE = MergeTree()
PARTITION BY toYYYYMM(timestamp)
ORDER BY (logset_id, worker, pid, timestamp)"#;

const CREATE_THRESHOLD: &str = r#"CREATE TABLE IF NOT EXISTS srm_threshold (
    logset_id UUID,
    worker UInt32,
    pid UInt32,
    timestamp DateTime64(3),
    cpu_limit UInt16,
    process_memory_limit UInt64,
    total_memory_limit UInt64
) ENGINE = MergeTree()
PARTITION BY toYYYYMM(timestamp)
ORDER BY (logset_id, worker, timestamp)"#;

/// Expected shape of every SRM table, in creation order.
pub fn table_specs() -> [TableSpec; 4] {
    [
        TableSpec {
            name: "srm_cpu_info",
            create_sql: CREATE_CPU_INFO,
            columns: &[
                ("logset_id", "UUID"),
                ("worker", "UInt32"),
                ("pid", "UInt32"),
                ("timestamp", "DateTime64(3)"),
                ("process_util", "UInt16"),
                ("total_util", "UInt16"),
            ],
        },
        TableSpec {
            name: "srm_memory_info",
            create_sql: CREATE_MEMORY_INFO,
            columns: &[
                ("logset_id", "UUID"),
                ("worker", "UInt32"),
                ("pid", "UInt32"),
                ("timestamp", "DateTime64(3)"),
                ("process_bytes", "UInt64"),
                ("total_bytes", "UInt64"),
            ],
        },
        TableSpec {
            name: "srm_action",
            create_sql: CREATE_ACTION,
            columns: &[
                ("logset_id", "UUID"),
                ("worker", "UInt32"),
                ("pid", "UInt32"),
                ("timestamp", "DateTime64(3)"),
                ("action", "LowCardinality(String)"),
                ("cpu_util", "Nullable(UInt16)"),
                ("process_bytes", "Nullable(UInt64)"),
                ("total_bytes", "Nullable(UInt64)"),
            ],
        },
        TableSpec {
            name: "srm_threshold",
            create_sql: CREATE_THRESHOLD,
            columns: &[
                ("logset_id", "UUID"),
                ("worker", "UInt32"),
                ("pid", "UInt32"),
                ("timestamp", "DateTime64(3)"),
                ("cpu_limit", "UInt16"),
                ("process_memory_limit", "UInt64"),
                ("total_memory_limit", "UInt64"),
            ],
        },
    ]
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tables_test;
