//! Tests for the ClickHouse destination (run without a server)

use chrono::{TimeZone, Utc};
use logsift_plugin::LogsetId;
use uuid::Uuid;

use super::*;
use crate::model::{ActionEvent, ActionKind, CpuInfo, MemoryInfo, SrmRecord, Threshold};

fn logset() -> LogsetId {
    LogsetId::new(Uuid::from_u128(7)).unwrap()
}

fn sample_records() -> Vec<SrmRecord> {
    let ts = Utc.timestamp_millis_opt(1_000).unwrap();
    vec![
        SrmRecord::Cpu(CpuInfo {
            logset: logset(),
            worker: 1,
            pid: 10,
            timestamp: ts,
            process_util: 10,
            total_util: 20,
        }),
        SrmRecord::Threshold(Threshold {
            logset: logset(),
            worker: 1,
            pid: 10,
            timestamp: ts,
            cpu_limit: 95,
            process_memory_limit: 1,
            total_memory_limit: 2,
        }),
        SrmRecord::Cpu(CpuInfo {
            logset: logset(),
            worker: 2,
            pid: 11,
            timestamp: ts,
            process_util: 30,
            total_util: 40,
        }),
        SrmRecord::Memory(MemoryInfo {
            logset: logset(),
            worker: 1,
            pid: 10,
            timestamp: ts,
            process_bytes: 100,
            total_bytes: 200,
        }),
        SrmRecord::Action(ActionEvent {
            logset: logset(),
            worker: 1,
            pid: 10,
            timestamp: ts,
            kind: ActionKind::CpuLimitExceeded,
            cpu_util: Some(99),
            process_bytes: None,
            total_bytes: None,
        }),
    ]
}

#[test]
fn test_split_rows_routes_by_kind() {
    let batches = split_rows(&sample_records());

    assert_eq!(batches.cpu.len(), 2);
    assert_eq!(batches.memory.len(), 1);
    assert_eq!(batches.actions.len(), 1);
    assert_eq!(batches.thresholds.len(), 1);

    assert_eq!(batches.cpu[0].worker, 1);
    assert_eq!(batches.cpu[1].worker, 2);
    assert_eq!(batches.actions[0].action, "cpu_exceeded");
    assert_eq!(batches.thresholds[0].cpu_limit, 95);
}

#[test]
fn test_split_rows_on_empty_batch() {
    let batches = split_rows(&[]);
    assert!(batches.cpu.is_empty());
    assert!(batches.memory.is_empty());
    assert!(batches.actions.is_empty());
    assert!(batches.thresholds.is_empty());
}

#[test]
fn test_config_defaults() {
    let config = SrmDestinationConfig::default();
    assert_eq!(config.url, DEFAULT_URL);
    assert_eq!(config.database, "default");
    assert!(config.username.is_none());
    assert!(config.password.is_none());
}

#[test]
fn test_config_chaining() {
    let config = SrmDestinationConfig::default()
        .with_url("http://clickhouse:8123")
        .with_database("telemetry")
        .with_credentials("writer", "secret");

    assert_eq!(config.url, "http://clickhouse:8123");
    assert_eq!(config.database, "telemetry");
    assert_eq!(config.username, Some("writer".to_string()));
    assert_eq!(config.password, Some("secret".to_string()));
}

#[test]
fn test_destination_exposes_config() {
    let destination =
        SrmDestination::new(SrmDestinationConfig::default().with_database("telemetry"));
    assert_eq!(destination.config().database, "telemetry");
}
