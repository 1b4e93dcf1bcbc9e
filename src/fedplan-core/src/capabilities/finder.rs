//! Capability lookup by model name.

use std::collections::HashMap;
use std::sync::Arc;

use common_error::FedplanResult;

use super::SourceCapabilities;

/// Resolves the capabilities of a source.
pub trait CapabilitiesFinder: Send + Sync {
    /// Capabilities for `model_name`, or `None` when the source is unknown.
    fn find_capabilities(&self, model_name: &str) -> FedplanResult<Option<Arc<SourceCapabilities>>>;
}

/// In-memory finder with an optional fallback entry.
#[derive(Debug, Clone, Default)]
pub struct BasicCapabilitiesFinder {
    sources: HashMap<String, Arc<SourceCapabilities>>,
    default: Option<Arc<SourceCapabilities>>,
}

impl BasicCapabilitiesFinder {
    /// Create an empty finder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register capabilities for a model.
    pub fn with_source(mut self, model_name: impl Into<String>, caps: SourceCapabilities) -> Self {
        self.sources.insert(model_name.into(), Arc::new(caps));
        self
    }

    /// Capabilities returned for models without an entry.
    pub fn with_default(mut self, caps: SourceCapabilities) -> Self {
        self.default = Some(Arc::new(caps));
        self
    }

    /// Register shared capabilities for a model.
    pub fn insert(&mut self, model_name: impl Into<String>, caps: Arc<SourceCapabilities>) {
        self.sources.insert(model_name.into(), caps);
    }
}

impl CapabilitiesFinder for BasicCapabilitiesFinder {
    fn find_capabilities(
        &self,
        model_name: &str,
    ) -> FedplanResult<Option<Arc<SourceCapabilities>>> {
        Ok(self
            .sources
            .get(model_name)
            .or(self.default.as_ref())
            .cloned())
    }
}
