//! Plugin run outcome
//!
//! "No data produced" is a normal, non-exceptional outcome: the run finished
//! cleanly but committed zero records. Hard failures travel through
//! [`crate::PluginError`] instead, so the host can tell the two apart.

/// Outcome of one plugin run, returned to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PluginResponse {
    /// True when the run completed without committing a single record
    pub generated_no_data: bool,

    /// Records committed to the destination store
    pub records_persisted: u64,

    /// Malformed or unrecognized source documents skipped during extraction
    pub extraction_warnings: u64,
}

impl PluginResponse {
    /// Outcome for a run that committed `records_persisted` records.
    pub fn produced(records_persisted: u64, extraction_warnings: u64) -> Self {
        Self {
            generated_no_data: records_persisted == 0,
            records_persisted,
            extraction_warnings,
        }
    }

    /// Outcome for a run that committed nothing.
    pub fn no_data(extraction_warnings: u64) -> Self {
        Self::produced(0, extraction_warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produced_clears_no_data_flag() {
        let response = PluginResponse::produced(12, 3);
        assert!(!response.generated_no_data);
        assert_eq!(response.records_persisted, 12);
        assert_eq!(response.extraction_warnings, 3);
    }

    #[test]
    fn zero_records_sets_no_data_flag() {
        assert!(PluginResponse::produced(0, 0).generated_no_data);
        assert!(PluginResponse::no_data(7).generated_no_data);
    }
}
