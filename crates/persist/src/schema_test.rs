//! Tests for the schema manager

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{SchemaExecutor, SchemaManager, TableSpec};
use crate::error::SchemaError;

const CPU_SPEC: TableSpec = TableSpec {
    name: "srm_cpu_info",
    create_sql: "CREATE TABLE IF NOT EXISTS srm_cpu_info (logset_id UUID, worker UInt32) ENGINE = MergeTree() ORDER BY worker",
    columns: &[("logset_id", "UUID"), ("worker", "UInt32")],
};

const ACTION_SPEC: TableSpec = TableSpec {
    name: "srm_action",
    create_sql: "CREATE TABLE IF NOT EXISTS srm_action (logset_id UUID) ENGINE = MergeTree() ORDER BY logset_id",
    columns: &[("logset_id", "UUID"), ("action", "String")],
};

/// In-process executor tracking tables, columns, and executed statements.
#[derive(Default)]
struct FakeExecutor {
    reachable: bool,
    tables: Mutex<BTreeMap<String, Vec<String>>>,
    statements: Mutex<Vec<String>>,
}

impl FakeExecutor {
    fn reachable() -> Self {
        Self {
            reachable: true,
            ..Self::default()
        }
    }

    fn with_table(self, name: &str, columns: &[&str]) -> Self {
        self.tables
            .lock()
            .unwrap()
            .insert(name.to_string(), columns.iter().map(|c| c.to_string()).collect());
        self
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl SchemaExecutor for FakeExecutor {
    async fn probe(&self) -> Result<(), SchemaError> {
        if self.reachable {
            Ok(())
        } else {
            Err(SchemaError::unreachable("connection refused"))
        }
    }

    async fn execute(&self, table: &str, sql: &str) -> Result<(), SchemaError> {
        self.statements.lock().unwrap().push(sql.to_string());

        let mut tables = self.tables.lock().unwrap();
        if sql.starts_with("CREATE TABLE") {
            // Column list sits between the first '(' and the first ')';
            // the specs used here have no nested parens in column types.
            let columns = sql
                .split_once('(')
                .and_then(|(_, rest)| rest.split_once(')'))
                .map(|(cols, _)| {
                    cols.split(',')
                        .filter_map(|c| c.split_whitespace().next())
                        .map(|c| c.to_string())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            tables.insert(table.to_string(), columns);
        } else if let Some(rest) = sql.split("ADD COLUMN IF NOT EXISTS ").nth(1) {
            let column = rest.split_whitespace().next().unwrap_or_default();
            tables
                .entry(table.to_string())
                .or_default()
                .push(column.to_string());
        }
        Ok(())
    }

    async fn table_exists(&self, table: &str) -> Result<bool, SchemaError> {
        Ok(self.tables.lock().unwrap().contains_key(table))
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>, SchemaError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default())
    }
}

#[tokio::test]
async fn test_creates_missing_tables() {
    let executor = FakeExecutor::reachable();
    let manager = SchemaManager::new(executor);

    manager.ensure_schema(&[CPU_SPEC, ACTION_SPEC]).await.unwrap();

    let statements = manager.executor.statements();
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS srm_cpu_info"));
    assert!(statements[1].starts_with("CREATE TABLE IF NOT EXISTS srm_action"));
}

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let executor = FakeExecutor::reachable();
    let manager = SchemaManager::new(executor);

    manager.ensure_schema(&[CPU_SPEC]).await.unwrap();
    let after_first = manager.executor.statements().len();
    assert_eq!(after_first, 1);

    // Second run sees a complete table and issues nothing new.
    manager.ensure_schema(&[CPU_SPEC]).await.unwrap();
    assert_eq!(manager.executor.statements().len(), after_first);
}

#[tokio::test]
async fn test_migrates_outdated_table() {
    let executor = FakeExecutor::reachable().with_table("srm_action", &["logset_id"]);
    let manager = SchemaManager::new(executor);

    manager.ensure_schema(&[ACTION_SPEC]).await.unwrap();

    let statements = manager.executor.statements();
    assert_eq!(
        statements,
        vec!["ALTER TABLE srm_action ADD COLUMN IF NOT EXISTS action String".to_string()]
    );
}

#[tokio::test]
async fn test_complete_table_is_untouched() {
    let executor =
        FakeExecutor::reachable().with_table("srm_cpu_info", &["logset_id", "worker"]);
    let manager = SchemaManager::new(executor);

    manager.ensure_schema(&[CPU_SPEC]).await.unwrap();
    manager.ensure_schema(&[CPU_SPEC]).await.unwrap();

    assert!(manager.executor.statements().is_empty());
}

#[tokio::test]
async fn test_unreachable_destination_issues_no_ddl() {
    let executor = FakeExecutor::default();
    let manager = SchemaManager::new(executor);

    let err = manager.ensure_schema(&[CPU_SPEC]).await.unwrap_err();
    assert!(matches!(err, SchemaError::Unreachable(_)));
    assert!(manager.executor.statements().is_empty());
}
