//! AI Provider Port - Interface for the text-completion engine.
//!
//! The engine is a black box: transcript plus tool schema in, one assistant
//! message out. That message may carry free text, tool calls, or both.
//!
//! # Design
//!
//! - Provider-agnostic, tool-calling aware request/response types
//! - Token usage and cost tracking
//! - Error types for common failure modes; no retry at this layer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;
use crate::domain::intake::tools::ToolDefinition;
use crate::domain::intake::Message;

/// Port for completion-engine interactions.
///
/// Implementations connect to an external LLM service and translate between
/// its wire format and the transcript types of the intake domain.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion. Fire-once: implementations do not retry.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Get provider information (name, model).
    fn provider_info(&self) -> ProviderInfo;
}

/// Request for a completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full outbound transcript, system instruction first.
    pub messages: Vec<Message>,
    /// Tools offered to the model (empty for a text-only follow-up).
    pub tools: Vec<ToolDefinition>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            tools: Vec::new(),
            temperature: None,
            metadata,
        }
    }

    /// Adds a message to the transcript.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Replaces the transcript.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Offers tools; the model decides whether to call them.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// True if any tool is offered.
    pub fn offers_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Conversation the request belongs to.
    pub session_id: SessionId,
    /// Trace ID for distributed tracing.
    pub trace_id: String,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(session_id: SessionId, trace_id: impl Into<String>) -> Self {
        Self {
            session_id,
            trace_id: trace_id.into(),
        }
    }

    /// Metadata whose trace id is the session id.
    pub fn for_session(session_id: SessionId) -> Self {
        Self::new(session_id, session_id.to_string())
    }
}

/// Response from a completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The assistant message (text and/or tool calls).
    pub message: Message,
    /// Token usage and cost.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
    /// Estimated cost in cents.
    pub estimated_cost_cents: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, cost_cents: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            estimated_cost_cents: cost_cents,
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Adds another usage record to this one.
    pub fn accumulate(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.estimated_cost_cents += other.estimated_cost_cents;
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Model stopped to call tools.
    ToolCalls,
    /// Hit max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
}

/// Provider identity, logged when the engine is wired up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai").
    pub name: String,
    /// Model identifier (e.g., "gpt-4o").
    pub model: String,
}

impl ProviderInfo {
    /// Creates new provider info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// No completion engine is configured (e.g. missing API key).
    #[error("completion engine not configured: {0}")]
    NotConfigured(String),

    /// Rate limited by provider. The turn fails; nothing is retried.
    #[error("rate limited by provider")]
    RateLimited,

    /// Context (prompt + history) exceeds model limit.
    #[error("context too long")]
    ContextTooLong,

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a not-configured error.
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured(message.into())
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True when the failure means the engine cannot be used at all, as
    /// opposed to a single failed call.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, AIError::NotConfigured(_) | AIError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::tools::INTAKE_TOOLS;
    use crate::domain::intake::Role;

    fn test_metadata() -> RequestMetadata {
        RequestMetadata::for_session(SessionId::new())
    }

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new(test_metadata())
            .with_message(Message::system("Be helpful"))
            .with_message(Message::user("Hello"))
            .with_temperature(0.7);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.temperature, Some(0.7));
        assert!(!request.offers_tools());
    }

    #[test]
    fn with_tools_offers_intake_tools() {
        let request =
            CompletionRequest::new(test_metadata()).with_tools(INTAKE_TOOLS.definitions().to_vec());

        assert!(request.offers_tools());
        assert_eq!(request.tools.len(), 2);
    }

    #[test]
    fn with_empty_tools_offers_nothing() {
        let request = CompletionRequest::new(test_metadata()).with_tools(Vec::new());
        assert!(!request.offers_tools());
    }

    #[test]
    fn metadata_for_session_uses_session_as_trace() {
        let session_id = SessionId::new();
        let metadata = RequestMetadata::for_session(session_id);
        assert_eq!(metadata.trace_id, session_id.to_string());
    }

    #[test]
    fn token_usage_calculates_total_and_accumulates() {
        let mut usage = TokenUsage::new(100, 50, 15);
        assert_eq!(usage.total_tokens, 150);

        usage.accumulate(&TokenUsage::new(10, 5, 1));
        assert_eq!(usage.prompt_tokens, 110);
        assert_eq!(usage.completion_tokens, 55);
        assert_eq!(usage.total_tokens, 165);
        assert_eq!(usage.estimated_cost_cents, 16);
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(AIError::not_configured("no key").is_configuration_error());
        assert!(AIError::AuthenticationFailed.is_configuration_error());

        assert!(!AIError::RateLimited.is_configuration_error());
        assert!(!AIError::unavailable("down").is_configuration_error());
        assert!(!AIError::network("reset").is_configuration_error());
    }
}
