//! Tests for row conversions and table specs

use chrono::{TimeZone, Utc};
use logsift_plugin::LogsetId;
use uuid::Uuid;

use super::*;
use crate::model::{ActionKind, RecordKind};

fn logset() -> LogsetId {
    LogsetId::new(Uuid::from_u128(0xabcd)).unwrap()
}

#[test]
fn test_cpu_row_conversion() {
    let info = CpuInfo {
        logset: logset(),
        worker: 3,
        pid: 101,
        timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        process_util: 45,
        total_util: 80,
    };

    let row = CpuInfoRow::from(&info);
    assert_eq!(row.logset_id, logset().as_uuid());
    assert_eq!(row.worker, 3);
    assert_eq!(row.pid, 101);
    assert_eq!(row.timestamp, 1_700_000_000_000);
    assert_eq!(row.process_util, 45);
    assert_eq!(row.total_util, 80);
}

#[test]
fn test_memory_row_conversion() {
    let info = MemoryInfo {
        logset: logset(),
        worker: 1,
        pid: 55,
        timestamp: Utc.timestamp_millis_opt(2_000).unwrap(),
        process_bytes: 1_073_741_824,
        total_bytes: 8_589_934_592,
    };

    let row = MemoryInfoRow::from(&info);
    assert_eq!(row.timestamp, 2_000);
    assert_eq!(row.process_bytes, 1_073_741_824);
    assert_eq!(row.total_bytes, 8_589_934_592);
}

#[test]
fn test_action_row_conversion() {
    let event = ActionEvent {
        logset: logset(),
        worker: 2,
        pid: 77,
        timestamp: Utc.timestamp_millis_opt(3_000).unwrap(),
        kind: ActionKind::MemoryLimitExceeded,
        cpu_util: None,
        process_bytes: Some(500),
        total_bytes: Some(900),
    };

    let row = ActionRow::from(&event);
    assert_eq!(row.action, "memory_exceeded");
    assert_eq!(row.cpu_util, None);
    assert_eq!(row.process_bytes, Some(500));
    assert_eq!(row.total_bytes, Some(900));
}

#[test]
fn test_threshold_row_conversion() {
    let threshold = Threshold {
        logset: logset(),
        worker: 7,
        pid: 201,
        timestamp: Utc.timestamp_millis_opt(500).unwrap(),
        cpu_limit: 95,
        process_memory_limit: 4_294_967_296,
        total_memory_limit: 17_179_869_184,
    };

    let row = ThresholdRow::from(&threshold);
    assert_eq!(row.timestamp, 500);
    assert_eq!(row.cpu_limit, 95);
    assert_eq!(row.process_memory_limit, 4_294_967_296);
}

#[test]
fn test_table_specs_cover_every_record_kind() {
    let specs = table_specs();
    let names: Vec<&str> = specs.iter().map(|s| s.name).collect();
    for kind in RecordKind::ALL {
        assert!(names.contains(&kind.table()), "no spec for {kind}");
    }
}

#[test]
fn test_table_specs_columns_appear_in_ddl() {
    for spec in table_specs() {
        for (column, column_type) in spec.columns {
            assert!(
                spec.create_sql.contains(&format!("{column} {column_type}")),
                "column {column} {column_type} missing from {} DDL",
                spec.name
            );
        }
    }
}
