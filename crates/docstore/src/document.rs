//! Raw document wrapper
//!
//! A [`Document`] is one arbitrary-shaped record from a source collection.
//! Documents are immutable inputs; accessors extract the handful of fields
//! the extraction pipelines care about without committing to a full schema.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One raw record from a source collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    fields: Map<String, Value>,
}

impl Document {
    /// Wrap a field map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value; returns `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Look up a field by dotted path (e.g., `"v.process_util"`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Field as a string slice.
    pub fn str_field(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Field as an unsigned integer.
    pub fn u64_field(&self, path: &str) -> Option<u64> {
        self.get(path)?.as_u64()
    }

    /// Document timestamp from the `ts` field.
    ///
    /// Accepts either epoch milliseconds (integer) or an RFC 3339 string;
    /// source collections carry both depending on the upstream parser.
    pub fn ts(&self) -> Option<DateTime<Utc>> {
        match self.fields.get("ts")? {
            Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Worker index from the `worker` field.
    pub fn worker(&self) -> Option<u32> {
        u32::try_from(self.u64_field("worker")?).ok()
    }

    /// Process id from the `pid` field.
    pub fn pid(&self) -> Option<u32> {
        u32::try_from(self.u64_field("pid")?).ok()
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;
