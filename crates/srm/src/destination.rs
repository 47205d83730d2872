//! ClickHouse destination for SRM records
//!
//! Owns the destination connection for a run: schema management through the
//! generic [`SchemaManager`] and batched typed inserts, one table per record
//! kind. Inserts for different tables in the same batch run concurrently.

use clickhouse::{insert::Insert, Client};
use logsift_persist::{Destination, SchemaError, SchemaExecutor, SchemaManager, WriteError};

use crate::model::{RecordKind, SrmRecord};
use crate::tables::{self, ActionRow, CpuInfoRow, MemoryInfoRow, ThresholdRow};

/// Default ClickHouse HTTP URL
pub const DEFAULT_URL: &str = "http://localhost:8123";

// =============================================================================
// Configuration
// =============================================================================

/// Connection configuration for the SRM destination.
#[derive(Debug, Clone)]
pub struct SrmDestinationConfig {
    /// ClickHouse HTTP URL
    pub url: String,

    /// Database name
    pub database: String,

    /// Username for authentication (optional)
    pub username: Option<String>,

    /// Password for authentication (optional)
    pub password: Option<String>,
}

impl Default for SrmDestinationConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            database: "default".into(),
            username: None,
            password: None,
        }
    }
}

impl SrmDestinationConfig {
    /// Set the ClickHouse URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the database name
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set authentication credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Build the ClickHouse client from this config
    pub fn build_client(&self) -> Client {
        let mut client = Client::default()
            .with_url(&self.url)
            .with_database(&self.database);

        if let Some(ref username) = self.username {
            client = client.with_user(username);
        }

        if let Some(ref password) = self.password {
            client = client.with_password(password);
        }

        client
    }
}

// =============================================================================
// Schema executor
// =============================================================================

/// Schema operations over a ClickHouse connection.
pub struct ClickHouseExecutor {
    client: Client,
    database: String,
}

impl ClickHouseExecutor {
    /// Wrap a client for schema work against `database`.
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }
}

impl SchemaExecutor for ClickHouseExecutor {
    async fn probe(&self) -> Result<(), SchemaError> {
        self.client
            .query("SELECT 1")
            .execute()
            .await
            .map_err(|e| SchemaError::unreachable(e.to_string()))
    }

    async fn execute(&self, table: &str, sql: &str) -> Result<(), SchemaError> {
        self.client
            .query(sql)
            .execute()
            .await
            .map_err(|e| SchemaError::statement(table, e.to_string()))
    }

    async fn table_exists(&self, table: &str) -> Result<bool, SchemaError> {
        let sql = format!(
            "SELECT 1 FROM system.tables WHERE database = '{}' AND name = '{}' LIMIT 1",
            self.database, table
        );
        let result = self
            .client
            .query(&sql)
            .fetch_optional::<u8>()
            .await
            .map_err(|e| SchemaError::statement(table, e.to_string()))?;
        Ok(result.is_some())
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<String>, SchemaError> {
        let sql = format!(
            "SELECT name FROM system.columns WHERE database = '{}' AND table = '{}' ORDER BY position",
            self.database, table
        );
        self.client
            .query(&sql)
            .fetch_all::<String>()
            .await
            .map_err(|e| SchemaError::statement(table, e.to_string()))
    }
}

// =============================================================================
// Destination
// =============================================================================

/// ClickHouse-backed [`Destination`] for [`SrmRecord`]s.
#[derive(Clone)]
pub struct SrmDestination {
    client: Client,
    config: SrmDestinationConfig,
}

impl SrmDestination {
    /// Connect with the given configuration.
    pub fn new(config: SrmDestinationConfig) -> Self {
        Self {
            client: config.build_client(),
            config,
        }
    }

    /// Connection configuration in use.
    pub fn config(&self) -> &SrmDestinationConfig {
        &self.config
    }

    async fn insert_rows<T>(&self, table: &str, rows: &[T]) -> Result<(), WriteError>
    where
        T: clickhouse::Row + serde::Serialize + Send + Sync,
    {
        if rows.is_empty() {
            return Ok(());
        }

        let mut insert: Insert<T> = self
            .client
            .insert(table)
            .map_err(|e| WriteError::new(format!("insert into {table}: {e}")))?;

        for row in rows {
            insert
                .write(row)
                .await
                .map_err(|e| WriteError::new(format!("insert into {table}: {e}")))?;
        }

        insert
            .end()
            .await
            .map_err(|e| WriteError::new(format!("insert into {table}: {e}")))?;

        tracing::debug!(table, rows = rows.len(), "flushed rows");
        Ok(())
    }
}

/// Per-table rows split out of one mixed-kind batch.
pub(crate) struct RowBatches {
    pub(crate) cpu: Vec<CpuInfoRow>,
    pub(crate) memory: Vec<MemoryInfoRow>,
    pub(crate) actions: Vec<ActionRow>,
    pub(crate) thresholds: Vec<ThresholdRow>,
}

pub(crate) fn split_rows(records: &[SrmRecord]) -> RowBatches {
    let mut batches = RowBatches {
        cpu: Vec::new(),
        memory: Vec::new(),
        actions: Vec::new(),
        thresholds: Vec::new(),
    };

    for record in records {
        match record {
            SrmRecord::Cpu(info) => batches.cpu.push(CpuInfoRow::from(info)),
            SrmRecord::Memory(info) => batches.memory.push(MemoryInfoRow::from(info)),
            SrmRecord::Action(event) => batches.actions.push(ActionRow::from(event)),
            SrmRecord::Threshold(threshold) => {
                batches.thresholds.push(ThresholdRow::from(threshold))
            }
        }
    }

    batches
}

impl Destination for SrmDestination {
    type Record = SrmRecord;

    async fn ensure_schema(&self) -> Result<(), SchemaError> {
        let executor = ClickHouseExecutor::new(self.client.clone(), self.config.database.clone());
        SchemaManager::new(executor)
            .ensure_schema(&tables::table_specs())
            .await
    }

    async fn write_batch(&self, records: &[SrmRecord]) -> Result<usize, WriteError> {
        let batches = split_rows(records);

        let (cpu, memory, actions, thresholds) = tokio::join!(
            self.insert_rows(RecordKind::CpuInfo.table(), &batches.cpu),
            self.insert_rows(RecordKind::MemoryInfo.table(), &batches.memory),
            self.insert_rows(RecordKind::Action.table(), &batches.actions),
            self.insert_rows(RecordKind::Threshold.table(), &batches.thresholds),
        );
        cpu?;
        memory?;
        actions?;
        thresholds?;

        Ok(records.len())
    }
}

#[cfg(test)]
#[path = "destination_test.rs"]
mod destination_test;
