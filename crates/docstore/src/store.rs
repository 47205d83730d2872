//! Read-only store trait

use std::collections::BTreeSet;
use std::future::Future;

use crate::{Document, Query, StoreError};

/// Read-only access to the named document collections of one logset.
///
/// # Contract
///
/// - `distinct_uints` returns an ascending, deduplicated set; reruns against
///   the same data yield the same set.
/// - `find` returns documents ordered by timestamp ascending, ties broken by
///   the store's insertion order, so reruns observe the same sequence.
/// - A collection name the store has never seen yields empty results, not an
///   error; only an unreachable backend is a [`StoreError`].
///
/// Implementations must tolerate concurrent readers without coordination;
/// this trait grants no write access.
pub trait DocumentStore: Send + Sync {
    /// Distinct unsigned-integer values of `field` across documents matching
    /// `query`. Documents without the field (or with a non-integer value)
    /// contribute nothing.
    fn distinct_uints(
        &self,
        collection: &str,
        field: &str,
        query: &Query,
    ) -> impl Future<Output = Result<BTreeSet<u64>, StoreError>> + Send;

    /// All documents matching `query`, timestamp-ascending.
    fn find(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// The earliest document matching `query`, if any.
    fn find_first(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Option<Document>, StoreError>> + Send;
}
