//! Extraction pipeline and plugin implementation
//!
//! One run walks `Init -> SchemaEnsured -> Extracting -> Draining ->
//! Completed | Failed`. Schema failures abort before any extraction; once
//! extraction has begun the persister is always drained, on the success and
//! failure paths alike, before the run reports its outcome.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use logsift_docstore::DocumentStore;
use logsift_persist::{
    ConcurrentPersister, Destination, PersisterConfig, PersisterHandle, StatusReporter,
};
use logsift_plugin::{LogsetId, Plugin, PluginError, PluginRequest, PluginResponse, RunOptions};
use tokio_util::sync::CancellationToken;

use crate::extract;
use crate::model::SrmRecord;
use crate::queries;

/// Source collections the plugin reads, in processing order.
pub const COLLECTION_DEPENDENCIES: [&str; 6] = [
    "backgrounder_cpp",
    "dataserver_cpp",
    "protocolserver",
    "vizportal_cpp",
    "vizqlserver_cpp",
    "wgserver_cpp",
];

/// Default status reporting interval
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(10);

async fn enqueue(
    handle: &PersisterHandle<SrmRecord>,
    record: SrmRecord,
) -> Result<(), PluginError> {
    handle.enqueue(record).await.map_err(PluginError::persist)
}

/// The server resource manager extraction plugin.
///
/// Generic over the document store and the destination so runs can target
/// the in-process implementations as easily as real backends.
pub struct ResourceManagerPlugin<S, D> {
    store: S,
    destination: D,
    config: PersisterConfig,
    status_interval: Duration,
}

impl<S, D> ResourceManagerPlugin<S, D>
where
    S: DocumentStore,
    D: Destination<Record = SrmRecord> + Clone,
{
    /// Create a plugin over a store and destination.
    pub fn new(store: S, destination: D) -> Self {
        Self {
            store,
            destination,
            config: PersisterConfig::default(),
            status_interval: DEFAULT_STATUS_INTERVAL,
        }
    }

    /// Override the persister configuration baseline. Per-run options from
    /// the request still apply on top.
    pub fn with_config(mut self, config: PersisterConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the status reporting interval.
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.status_interval = interval;
        self
    }

    fn persister_config(&self, options: &RunOptions) -> PersisterConfig {
        let mut config = self.config.clone();
        if let Some(queue_size) = options.queue_size {
            config = config.with_queue_size(queue_size);
        }
        if let Some(batch_size) = options.batch_size {
            config = config.with_batch_size(batch_size);
        }
        if let Some(retry_attempts) = options.retry_attempts {
            config = config.with_retry_attempts(retry_attempts);
        }
        config
    }

    async fn run(&self, request: &PluginRequest) -> Result<PluginResponse, PluginError> {
        let logset = request.logset();
        let config = self.persister_config(request.options());

        tracing::info!(%logset, "resource manager extraction starting");

        // Schema must be in place before the first write; failure here is
        // fatal and nothing has been extracted yet.
        self.destination
            .ensure_schema()
            .await
            .map_err(PluginError::schema)?;

        let persister = ConcurrentPersister::spawn(self.destination.clone(), config);

        let cancel = CancellationToken::new();
        let reporter = StatusReporter::new(self.status_interval)
            .provider(Arc::new(persister.progress_handle("resource-manager")));
        let reporter_task = tokio::spawn(reporter.run(cancel.clone()));

        // Extraction result is held, not propagated, until the persister has
        // drained: the drain must happen on the failure path too.
        let handle = persister.handle();
        let extraction = self.extract_all(logset, &handle).await;
        drop(handle);

        let drained = persister.shutdown().await;

        cancel.cancel();
        let _ = reporter_task.await;

        let summary = match drained {
            Ok(summary) => summary,
            Err(e) => {
                if let Err(extraction_err) = extraction {
                    tracing::error!(error = %extraction_err, "extraction also failed");
                }
                return Err(PluginError::persist(e));
            }
        };
        let warnings = extraction?;

        tracing::info!(
            committed = summary.records_committed,
            batches = summary.batches_written,
            retries = summary.retries,
            warnings,
            "resource manager extraction finished"
        );

        if summary.records_committed == 0 {
            tracing::info!("no server resource manager data was persisted");
            return Ok(PluginResponse::no_data(warnings));
        }

        Ok(PluginResponse::produced(summary.records_committed, warnings))
    }

    /// Walk every collection dependency, worker, and pid; enqueue derived
    /// records. Returns the number of documents skipped with warnings.
    async fn extract_all(
        &self,
        logset: LogsetId,
        handle: &PersisterHandle<SrmRecord>,
    ) -> Result<u64, PluginError> {
        let mut warnings = 0u64;

        for collection in COLLECTION_DEPENDENCIES {
            tracing::info!(collection, "processing resource manager sessions");

            let workers = self
                .store
                .distinct_uints(collection, "worker", &queries::workers())
                .await
                .map_err(PluginError::source)?;

            for worker in workers {
                let Ok(worker) = u32::try_from(worker) else {
                    warnings += 1;
                    tracing::warn!(collection, worker, "worker index out of range, skipping");
                    continue;
                };
                warnings += self
                    .persist_thresholds(logset, worker, collection, handle)
                    .await?;
                warnings += self
                    .persist_events(logset, worker, collection, handle)
                    .await?;
            }
        }

        Ok(warnings)
    }

    /// Derive and enqueue one threshold per start marker for a worker.
    async fn persist_thresholds(
        &self,
        logset: LogsetId,
        worker: u32,
        collection: &str,
        handle: &PersisterHandle<SrmRecord>,
    ) -> Result<u64, PluginError> {
        let mut warnings = 0u64;

        let start_markers = self
            .store
            .find(collection, &queries::start_markers(worker))
            .await
            .map_err(PluginError::source)?;

        for start in &start_markers {
            let Some(context_query) = queries::threshold_context(worker, start) else {
                warnings += 1;
                tracing::warn!(collection, worker, "start marker missing pid or ts, skipping");
                continue;
            };

            let context_doc = self
                .store
                .find_first(collection, &context_query)
                .await
                .map_err(PluginError::source)?;

            // A start marker without limits is a data-quality condition,
            // not a failure.
            let Some(context_doc) = context_doc else {
                warnings += 1;
                tracing::warn!(collection, worker, "no limits context for start marker");
                continue;
            };

            match extract::threshold(logset, worker, start, &context_doc) {
                Ok(threshold) => enqueue(handle, SrmRecord::Threshold(threshold)).await?,
                Err(warning) => {
                    warnings += 1;
                    tracing::warn!(collection, %warning, "threshold extraction");
                }
            }
        }

        Ok(warnings)
    }

    /// Derive and enqueue CPU, memory, and action events per pid of a worker.
    async fn persist_events(
        &self,
        logset: LogsetId,
        worker: u32,
        collection: &str,
        handle: &PersisterHandle<SrmRecord>,
    ) -> Result<u64, PluginError> {
        let mut warnings = 0u64;

        let pids = self
            .store
            .distinct_uints(collection, "pid", &queries::pids(worker))
            .await
            .map_err(PluginError::source)?;

        for pid in pids {
            let Ok(pid) = u32::try_from(pid) else {
                warnings += 1;
                tracing::warn!(collection, worker, pid, "pid out of range, skipping");
                continue;
            };

            let cpu_docs = self
                .store
                .find(collection, &queries::cpu_samples(worker, pid))
                .await
                .map_err(PluginError::source)?;
            for doc in &cpu_docs {
                match extract::cpu_info(logset, worker, pid, doc) {
                    Ok(info) => enqueue(handle, SrmRecord::Cpu(info)).await?,
                    Err(warning) => {
                        warnings += 1;
                        tracing::warn!(collection, %warning, "cpu extraction");
                    }
                }
            }

            let memory_docs = self
                .store
                .find(collection, &queries::memory_samples(worker, pid))
                .await
                .map_err(PluginError::source)?;
            for doc in &memory_docs {
                match extract::memory_info(logset, worker, pid, doc) {
                    Ok(info) => enqueue(handle, SrmRecord::Memory(info)).await?,
                    Err(warning) => {
                        warnings += 1;
                        tracing::warn!(collection, %warning, "memory extraction");
                    }
                }
            }

            let action_docs = self
                .store
                .find(collection, &queries::actions(worker, pid))
                .await
                .map_err(PluginError::source)?;
            for doc in &action_docs {
                match extract::action_event(logset, worker, pid, doc) {
                    Ok(event) => enqueue(handle, SrmRecord::Action(event)).await?,
                    Err(warning) => {
                        warnings += 1;
                        tracing::warn!(collection, %warning, "action extraction");
                    }
                }
            }
        }

        Ok(warnings)
    }
}

impl<S, D> Plugin for ResourceManagerPlugin<S, D>
where
    S: DocumentStore,
    D: Destination<Record = SrmRecord> + Clone,
{
    fn name(&self) -> &'static str {
        "resource-manager"
    }

    fn collection_dependencies(&self) -> BTreeSet<&'static str> {
        COLLECTION_DEPENDENCIES.into_iter().collect()
    }

    fn artifact_outputs(&self) -> Vec<&'static str> {
        vec!["resource_manager"]
    }

    async fn execute(&self, request: &PluginRequest) -> Result<PluginResponse, PluginError> {
        self.run(request).await
    }
}
