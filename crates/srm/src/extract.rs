//! Document-to-record extraction
//!
//! Pure transformations from raw documents to typed records. No I/O, no
//! shared state: the same documents always yield the same records, which is
//! what makes a pipeline run safe to repeat after a partial failure.
//!
//! A document that cannot be understood produces an [`ExtractWarning`] for
//! the caller to count and skip; extraction itself never aborts a run.

use chrono::{DateTime, Utc};
use logsift_docstore::Document;
use logsift_plugin::LogsetId;
use thiserror::Error;

use crate::model::{ActionEvent, ActionKind, CpuInfo, MemoryInfo, Threshold};

/// A document the extractor skipped, with enough context to find it again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("skipped {context}: {reason}")]
pub struct ExtractWarning {
    /// Where the document came from (record kind, worker, pid)
    pub context: String,
    /// What was wrong with it
    pub reason: String,
}

impl ExtractWarning {
    fn new(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

fn required_ts(doc: &Document, context: &str) -> Result<DateTime<Utc>, ExtractWarning> {
    doc.ts()
        .ok_or_else(|| ExtractWarning::new(context, "missing or unparseable `ts`"))
}

fn required_u64(doc: &Document, field: &str, context: &str) -> Result<u64, ExtractWarning> {
    doc.u64_field(field)
        .ok_or_else(|| ExtractWarning::new(context, format!("missing integer field `{field}`")))
}

fn required_percent(doc: &Document, field: &str, context: &str) -> Result<u16, ExtractWarning> {
    let value = required_u64(doc, field, context)?;
    u16::try_from(value)
        .map_err(|_| ExtractWarning::new(context, format!("`{field}` out of range: {value}")))
}

/// Derive a CPU sample from an `srm.cpu` document.
pub fn cpu_info(
    logset: LogsetId,
    worker: u32,
    pid: u32,
    doc: &Document,
) -> Result<CpuInfo, ExtractWarning> {
    let context = format!("cpu sample worker={worker} pid={pid}");
    Ok(CpuInfo {
        logset,
        worker,
        pid,
        timestamp: required_ts(doc, &context)?,
        process_util: required_percent(doc, "v.process_util", &context)?,
        total_util: required_percent(doc, "v.total_util", &context)?,
    })
}

/// Derive a memory sample from an `srm.mem` document.
pub fn memory_info(
    logset: LogsetId,
    worker: u32,
    pid: u32,
    doc: &Document,
) -> Result<MemoryInfo, ExtractWarning> {
    let context = format!("memory sample worker={worker} pid={pid}");
    Ok(MemoryInfo {
        logset,
        worker,
        pid,
        timestamp: required_ts(doc, &context)?,
        process_bytes: required_u64(doc, "v.process_bytes", &context)?,
        total_bytes: required_u64(doc, "v.total_bytes", &context)?,
    })
}

/// Derive an enforcement action from an `srm.action` document.
pub fn action_event(
    logset: LogsetId,
    worker: u32,
    pid: u32,
    doc: &Document,
) -> Result<ActionEvent, ExtractWarning> {
    let context = format!("action worker={worker} pid={pid}");
    let kind_str = doc
        .str_field("v.kind")
        .ok_or_else(|| ExtractWarning::new(&context, "missing string field `v.kind`"))?;
    let kind = ActionKind::parse(kind_str)
        .ok_or_else(|| ExtractWarning::new(&context, format!("unrecognized action kind '{kind_str}'")))?;

    Ok(ActionEvent {
        logset,
        worker,
        pid,
        timestamp: required_ts(doc, &context)?,
        kind,
        cpu_util: doc.u64_field("v.cpu_util").and_then(|v| u16::try_from(v).ok()),
        process_bytes: doc.u64_field("v.process_bytes"),
        total_bytes: doc.u64_field("v.total_bytes"),
    })
}

/// Derive a threshold from a start marker and its limits context document.
pub fn threshold(
    logset: LogsetId,
    worker: u32,
    start: &Document,
    context_doc: &Document,
) -> Result<Threshold, ExtractWarning> {
    let context = format!("threshold worker={worker}");
    let pid = start
        .pid()
        .ok_or_else(|| ExtractWarning::new(&context, "start marker missing `pid`"))?;
    let context = format!("threshold worker={worker} pid={pid}");

    Ok(Threshold {
        logset,
        worker,
        pid,
        timestamp: required_ts(start, &context)?,
        cpu_limit: required_percent(context_doc, "v.cpu_limit", &context)?,
        process_memory_limit: required_u64(context_doc, "v.process_memory_limit", &context)?,
        total_memory_limit: required_u64(context_doc, "v.total_memory_limit", &context)?,
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod extract_test;
