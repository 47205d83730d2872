//! Plugin request values
//!
//! A [`PluginRequest`] is constructed once by the host, validated at
//! construction, and never mutated afterwards. Run options are a typed,
//! enumerated set; unknown keys are rejected up front rather than at the
//! point of use.

use thiserror::Error;
use uuid::Uuid;

/// Stable identity of one analyzed logset (a content hash of the source
/// dataset). Attached to every record the pipeline derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct LogsetId(Uuid);

impl LogsetId {
    /// Wrap a logset hash. The nil UUID is not a valid identity.
    pub fn new(id: Uuid) -> Result<Self, RequestError> {
        if id.is_nil() {
            return Err(RequestError::NilLogsetId);
        }
        Ok(Self(id))
    }

    /// The underlying UUID value.
    #[inline]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for LogsetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Request construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The logset identity was the nil UUID
    #[error("logset identity must not be nil")]
    NilLogsetId,

    /// An option key is not part of the recognized set
    #[error("unrecognized run option '{0}'")]
    UnknownOption(String),

    /// An option value failed to parse
    #[error("invalid value '{value}' for run option '{key}': {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },
}

/// Recognized per-run tuning options
///
/// Every field is optional; unset fields fall back to the plugin's configured
/// defaults. Constructed either directly or from key/value pairs via
/// [`RunOptions::from_pairs`], which validates the key set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Persister buffer capacity (records)
    pub queue_size: Option<usize>,

    /// Persister batch size (records per destination write)
    pub batch_size: Option<usize>,

    /// Bounded retry attempts for failed destination writes
    pub retry_attempts: Option<usize>,
}

impl RunOptions {
    /// Parse options from key/value pairs, rejecting unknown keys.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "queue_size" => &mut options.queue_size,
                "batch_size" => &mut options.batch_size,
                "retry_attempts" => &mut options.retry_attempts,
                other => return Err(RequestError::UnknownOption(other.to_string())),
            };
            let parsed = value.parse::<usize>().map_err(|e| RequestError::InvalidOption {
                key: key.to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })?;
            *slot = Some(parsed);
        }
        Ok(options)
    }
}

/// One plugin run request, supplied by the host.
///
/// Immutable after construction; validation happens in [`PluginRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRequest {
    logset: LogsetId,
    options: RunOptions,
}

impl PluginRequest {
    /// Build a validated request.
    pub fn new(logset: Uuid, options: RunOptions) -> Result<Self, RequestError> {
        Ok(Self {
            logset: LogsetId::new(logset)?,
            options,
        })
    }

    /// Identity of the logset this run analyzes.
    #[inline]
    pub fn logset(&self) -> LogsetId {
        self.logset
    }

    /// Tuning options supplied for this run.
    #[inline]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }
}
