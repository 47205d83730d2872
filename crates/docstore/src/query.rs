//! Typed query predicates
//!
//! A [`Query`] is a conjunction of field predicates matched against a
//! [`Document`]. Queries are plain values: building one performs no I/O, and
//! matching is pure, which keeps the extraction pipelines replayable.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Document;

#[derive(Debug, Clone, PartialEq)]
enum Clause {
    /// Field equals a JSON value
    Eq(String, Value),
    /// Field is present, whatever its value
    Exists(String),
    /// Document timestamp is at or after the instant
    TsSince(DateTime<Utc>),
}

/// Conjunction of predicates over document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    /// Empty query; matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`. Paths may be dotted (`"v.kind"`).
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq(field.into(), value.into()));
        self
    }

    /// Require the field to be present.
    pub fn exists(mut self, field: impl Into<String>) -> Self {
        self.clauses.push(Clause::Exists(field.into()));
        self
    }

    /// Require the document timestamp to be at or after `since`.
    /// Documents without a parseable `ts` never match this clause.
    pub fn ts_since(mut self, since: DateTime<Utc>) -> Self {
        self.clauses.push(Clause::TsSince(since));
        self
    }

    /// Whether every clause holds for `doc`.
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq(field, value) => doc.get(field) == Some(value),
            Clause::Exists(field) => doc.get(field).is_some(),
            Clause::TsSince(since) => doc.ts().is_some_and(|ts| ts >= *since),
        })
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
