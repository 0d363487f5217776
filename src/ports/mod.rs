//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - the text-completion engine (tool-calling aware)
//! - `LeadStore` - lead and appointment inserts
//! - `ActivityLog` - best-effort debug logs and counters

mod activity_log;
mod ai_provider;
mod lead_store;

pub use activity_log::ActivityLog;
pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage,
};
pub use lead_store::LeadStore;
