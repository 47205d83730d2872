//! In-process document store
//!
//! [`MemoryStore`] holds a parsed logset entirely in memory. The host loads
//! collections once through [`MemoryStoreBuilder`]; after `build` the store
//! is immutable and cheap to clone, so any number of pipeline runs can read
//! it concurrently without locking.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::{Document, DocumentStore, Query, StoreError};

/// Builder that accumulates collections before freezing them into a store.
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    collections: HashMap<String, Vec<Document>>,
}

impl MemoryStoreBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a named collection.
    pub fn collection(mut self, name: impl Into<String>, docs: Vec<Document>) -> Self {
        self.collections.entry(name.into()).or_default().extend(docs);
        self
    }

    /// Freeze into an immutable store. Each collection is sorted by document
    /// timestamp (stable, so ties keep insertion order); documents without a
    /// parseable timestamp sort first.
    pub fn build(mut self) -> MemoryStore {
        for docs in self.collections.values_mut() {
            docs.sort_by_key(|d| d.ts());
        }
        MemoryStore {
            collections: Arc::new(self.collections),
        }
    }
}

/// Immutable in-process document store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Empty store; every collection reads as empty.
    pub fn empty() -> Self {
        Self::default()
    }

    fn docs(&self, collection: &str) -> &[Document] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    async fn distinct_uints(
        &self,
        collection: &str,
        field: &str,
        query: &Query,
    ) -> Result<BTreeSet<u64>, StoreError> {
        Ok(self
            .docs(collection)
            .iter()
            .filter(|d| query.matches(d))
            .filter_map(|d| d.u64_field(field))
            .collect())
    }

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .docs(collection)
            .iter()
            .filter(|d| query.matches(d))
            .cloned()
            .collect())
    }

    async fn find_first(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .docs(collection)
            .iter()
            .find(|d| query.matches(d))
            .cloned())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
