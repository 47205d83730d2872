//! Plugin capability trait

use std::collections::BTreeSet;

use crate::{PluginError, PluginRequest, PluginResponse};

/// Trait implemented by every analysis plugin.
///
/// The host consults `collection_dependencies` before invocation to decide
/// whether a plugin is eligible for a given logset, runs `execute`, and
/// treats `artifact_outputs` as the names of report artifacts that depend on
/// the tables the plugin persisted.
pub trait Plugin: Send + Sync {
    /// Returns the plugin name (e.g., "resource-manager")
    fn name(&self) -> &'static str;

    /// Source collections this plugin reads. The host skips the plugin when
    /// none of these exist in the logset.
    fn collection_dependencies(&self) -> BTreeSet<&'static str>;

    /// Named report artifacts that consume this plugin's persisted tables.
    fn artifact_outputs(&self) -> Vec<&'static str>;

    /// Run one extraction against the request's logset.
    ///
    /// # Returns
    /// A `PluginResponse` describing whether any data was produced, or a
    /// fatal [`PluginError`]. A run that produces nothing is `Ok` with
    /// `generated_no_data` set, not an error.
    fn execute(
        &self,
        request: &PluginRequest,
    ) -> impl std::future::Future<Output = Result<PluginResponse, PluginError>> + Send;
}
