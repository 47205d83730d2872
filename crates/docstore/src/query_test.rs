//! Tests for query matching

use chrono::{TimeZone, Utc};
use serde_json::json;

use super::Query;
use crate::Document;

fn doc(value: serde_json::Value) -> Document {
    Document::from_value(value).expect("object document")
}

#[test]
fn test_empty_query_matches_everything() {
    assert!(Query::new().matches(&doc(json!({}))));
    assert!(Query::new().matches(&doc(json!({"k": "srm.cpu"}))));
}

#[test]
fn test_eq_on_strings_and_numbers() {
    let d = doc(json!({"k": "srm.cpu", "worker": 3}));

    assert!(Query::new().eq("k", "srm.cpu").matches(&d));
    assert!(Query::new().eq("worker", 3u64).matches(&d));
    assert!(!Query::new().eq("k", "srm.mem").matches(&d));
    assert!(!Query::new().eq("worker", 4u64).matches(&d));
}

#[test]
fn test_eq_on_dotted_path() {
    let d = doc(json!({"v": {"kind": "cpu_exceeded"}}));
    assert!(Query::new().eq("v.kind", "cpu_exceeded").matches(&d));
    assert!(!Query::new().eq("v.kind", "memory_exceeded").matches(&d));
}

#[test]
fn test_exists_clause() {
    let d = doc(json!({"pid": 101}));
    assert!(Query::new().exists("pid").matches(&d));
    assert!(!Query::new().exists("worker").matches(&d));
}

#[test]
fn test_ts_since_clause() {
    let start = Utc.timestamp_millis_opt(1_000).unwrap();
    let before = doc(json!({"ts": 500}));
    let at = doc(json!({"ts": 1_000}));
    let after = doc(json!({"ts": 1_500}));
    let missing = doc(json!({}));

    let query = Query::new().ts_since(start);
    assert!(!query.matches(&before));
    assert!(query.matches(&at));
    assert!(query.matches(&after));
    assert!(!query.matches(&missing));
}

#[test]
fn test_clauses_are_conjunctive() {
    let d = doc(json!({"k": "srm.start", "worker": 7, "pid": 201}));

    let both = Query::new().eq("k", "srm.start").eq("worker", 7u64);
    assert!(both.matches(&d));

    let one_wrong = Query::new().eq("k", "srm.start").eq("worker", 8u64);
    assert!(!one_wrong.matches(&d));
}
