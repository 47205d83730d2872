//! Idempotent destination schema management
//!
//! [`SchemaManager`] brings the destination tables to the current expected
//! shape before any write is issued: absent tables are created, present
//! tables gain any missing columns. Running it twice in a row is a no-op;
//! nothing here is destructive.

use std::future::Future;

use crate::error::SchemaError;

/// Expected shape of one destination table.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Table name
    pub name: &'static str,

    /// Full CREATE TABLE statement (must be IF NOT EXISTS)
    pub create_sql: &'static str,

    /// Expected columns as (name, type) pairs, in declaration order
    pub columns: &'static [(&'static str, &'static str)],
}

/// Backend operations the schema manager needs.
///
/// Implemented per destination database; test fakes implement it in-process.
pub trait SchemaExecutor: Send + Sync {
    /// Cheap connectivity probe; fails fast when the destination is
    /// unreachable so no partial DDL is ever issued.
    fn probe(&self) -> impl Future<Output = Result<(), SchemaError>> + Send;

    /// Execute one DDL statement against `table`.
    fn execute(
        &self,
        table: &str,
        sql: &str,
    ) -> impl Future<Output = Result<(), SchemaError>> + Send;

    /// Whether `table` exists.
    fn table_exists(&self, table: &str) -> impl Future<Output = Result<bool, SchemaError>> + Send;

    /// Column names of an existing table.
    fn table_columns(
        &self,
        table: &str,
    ) -> impl Future<Output = Result<Vec<String>, SchemaError>> + Send;
}

/// Creates or migrates destination tables idempotently.
pub struct SchemaManager<E: SchemaExecutor> {
    executor: E,
}

impl<E: SchemaExecutor> SchemaManager<E> {
    /// Wrap a backend executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Bring every table in `tables` to its expected shape.
    ///
    /// Fatal on any failure; must complete before the first record write.
    pub async fn ensure_schema(&self, tables: &[TableSpec]) -> Result<(), SchemaError> {
        self.executor.probe().await?;

        for spec in tables {
            if !self.executor.table_exists(spec.name).await? {
                tracing::info!(table = spec.name, "creating destination table");
                self.executor.execute(spec.name, spec.create_sql).await?;
                continue;
            }

            let existing = self.executor.table_columns(spec.name).await?;
            for (column, column_type) in spec.columns {
                if existing.iter().any(|c| c == column) {
                    continue;
                }
                tracing::info!(
                    table = spec.name,
                    column,
                    "migrating destination table: adding missing column"
                );
                let sql = format!(
                    "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
                    spec.name, column, column_type
                );
                self.executor.execute(spec.name, &sql).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;
