//! Tests for the document wrapper

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::Document;

fn doc(value: serde_json::Value) -> Document {
    Document::from_value(value).expect("object document")
}

#[test]
fn test_from_value_rejects_non_objects() {
    assert!(Document::from_value(json!([1, 2, 3])).is_none());
    assert!(Document::from_value(json!("scalar")).is_none());
    assert!(Document::from_value(json!({"k": "srm.cpu"})).is_some());
}

#[test]
fn test_get_walks_dotted_paths() {
    let d = doc(json!({"v": {"process_util": 42, "nested": {"deep": true}}}));

    assert_eq!(d.u64_field("v.process_util"), Some(42));
    assert_eq!(d.get("v.nested.deep"), Some(&json!(true)));
    assert_eq!(d.get("v.missing"), None);
    assert_eq!(d.get("missing.path"), None);
}

#[test]
fn test_ts_accepts_epoch_millis() {
    let d = doc(json!({"ts": 1_700_000_000_000_i64}));
    let expected = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    assert_eq!(d.ts(), Some(expected));
}

#[test]
fn test_ts_accepts_rfc3339() {
    let d = doc(json!({"ts": "2023-11-14T22:13:20Z"}));
    let expected = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    assert_eq!(d.ts(), Some(expected));
}

#[test]
fn test_ts_rejects_garbage() {
    assert_eq!(doc(json!({"ts": "not a time"})).ts(), None);
    assert_eq!(doc(json!({"ts": [1]})).ts(), None);
    assert_eq!(doc(json!({})).ts(), None);
}

#[test]
fn test_worker_and_pid_accessors() {
    let d = doc(json!({"worker": 3, "pid": 101}));
    assert_eq!(d.worker(), Some(3));
    assert_eq!(d.pid(), Some(101));

    let missing = doc(json!({"worker": "three"}));
    assert_eq!(missing.worker(), None);
    assert_eq!(missing.pid(), None);
}

#[test]
fn test_worker_out_of_range_is_none() {
    let d = doc(json!({"worker": u64::MAX}));
    assert_eq!(d.worker(), None);
}
