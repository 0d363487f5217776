//! Stand-in provider used when no completion engine credentials are present.
//!
//! Every call fails with `AIError::NotConfigured`, which the turn engine maps
//! to a configuration failure without touching any state.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Provider that refuses every request.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    reason: String,
}

impl UnconfiguredProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnconfiguredProvider {
    fn default() -> Self {
        Self::new("no API key configured")
    }
}

#[async_trait]
impl AIProvider for UnconfiguredProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::not_configured(self.reason.clone()))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("unconfigured", "none")
    }
}
