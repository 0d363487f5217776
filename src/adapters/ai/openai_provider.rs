//! OpenAI Provider - Implementation of AIProvider for the chat-completions API.
//!
//! Sends the transcript together with the tool schema and maps tool calls in
//! both directions.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::intake::{FunctionCall, Message, Role, ToolCallRecord};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let tools: Vec<serde_json::Value> = request
            .tools
            .iter()
            .map(|tool| tool.to_openai_format())
            .collect();

        OpenAIRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(OpenAIMessage::from_domain).collect(),
            tools,
            tool_choice: request.offers_tools().then_some("auto"),
            temperature: request.temperature,
        }
    }

    /// Sends a request and handles the response.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::RateLimited),
            400 => {
                if error_body.contains("maximum context length")
                    || error_body.contains("context_length_exceeded")
                {
                    Err(AIError::ContextTooLong)
                } else {
                    Err(AIError::InvalidRequest(error_body))
                }
            }
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Converts a decoded API response into a completion.
    fn into_completion(&self, openai_response: OpenAIResponse) -> Result<CompletionResponse, AIError> {
        let choice = openai_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AIError::parse("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("tool_calls") | Some("function_call") => FinishReason::ToolCalls,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        if finish_reason == FinishReason::ContentFilter && choice.message.content.is_none() {
            return Err(AIError::content_filtered("response blocked by provider"));
        }

        let usage = openai_response
            .usage
            .map(|u| {
                TokenUsage::new(
                    u.prompt_tokens,
                    u.completion_tokens,
                    self.calculate_cost(u.prompt_tokens, u.completion_tokens),
                )
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            message: choice.message.into_domain(),
            usage,
            model: openai_response.model,
            finish_reason,
        })
    }

    /// Calculates estimated cost in cents based on model and token counts.
    fn calculate_cost(&self, prompt_tokens: u32, completion_tokens: u32) -> u32 {
        // Prices per 1M tokens (in cents)
        let (prompt_price, completion_price) = match self.config.model.as_str() {
            m if m.starts_with("gpt-4o-mini") => (15, 60),
            m if m.starts_with("gpt-4o") => (250, 1000),
            m if m.starts_with("gpt-4-turbo") => (1000, 3000),
            m if m.starts_with("gpt-4") => (3000, 6000),
            m if m.starts_with("gpt-3.5") => (50, 150),
            _ => (250, 1000),
        };

        let prompt_cost = (prompt_tokens as u64 * prompt_price) / 1_000_000;
        let completion_cost = (completion_tokens as u64 * completion_price) / 1_000_000;

        (prompt_cost + completion_cost) as u32
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        self.into_completion(openai_response)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn from_domain(message: &Message) -> Self {
        let role = match message.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        };

        let tool_calls = message.has_tool_calls().then(|| {
            message
                .tool_calls()
                .iter()
                .map(|record| OpenAIToolCall {
                    id: record.id.clone(),
                    call_type: "function".to_string(),
                    function: OpenAIFunction {
                        name: record.function.name.clone(),
                        arguments: match &record.function.arguments {
                            serde_json::Value::String(encoded) => encoded.clone(),
                            serde_json::Value::Null => "{}".to_string(),
                            other => other.to_string(),
                        },
                    },
                })
                .collect()
        });

        Self {
            role: role.to_string(),
            content: message.content.clone(),
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }

    fn into_domain(self) -> Message {
        let calls = self
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRecord {
                id: call.id,
                call_type: call.call_type,
                function: FunctionCall {
                    name: call.function.name,
                    arguments: serde_json::Value::String(call.function.arguments),
                },
            })
            .collect();

        Message::assistant_with_tool_calls(self.content, calls)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    call_type: String,
    function: OpenAIFunction,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::intake::tools::INTAKE_TOOLS;
    use crate::ports::RequestMetadata;
    use serde_json::json;

    fn provider(model: &str) -> OpenAIProvider {
        OpenAIProvider::new(OpenAIConfig::new("test").with_model(model)).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::for_session(SessionId::new()))
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o-mini")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let provider = OpenAIProvider::new(
            OpenAIConfig::new("k").with_base_url("http://localhost:9999/v1/"),
        )
        .unwrap();
        assert_eq!(provider.completions_url(), "http://localhost:9999/v1/chat/completions");
    }

    #[test]
    fn request_includes_tools_with_auto_choice() {
        let req = request()
            .with_message(Message::user("hi"))
            .with_tools(INTAKE_TOOLS.definitions().to_vec());

        let body = serde_json::to_value(provider("gpt-4o").to_openai_request(&req)).unwrap();

        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"].as_array().unwrap().len(), 2);
        assert_eq!(body["tools"][0]["function"]["name"], "update_extraction");
    }

    #[test]
    fn follow_up_request_omits_tools() {
        let req = request().with_message(Message::user("hi"));
        let body = serde_json::to_value(provider("gpt-4o").to_openai_request(&req)).unwrap();

        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn tool_call_history_is_forwarded() {
        let assistant = Message::assistant_with_tool_calls(
            None,
            vec![ToolCallRecord::function("call_1", "update_extraction", &json!({ "name": "Jane" }))],
        );
        let req = request()
            .with_message(assistant)
            .with_message(Message::tool_result("call_1", "Success"));

        let body = serde_json::to_value(provider("gpt-4o").to_openai_request(&req)).unwrap();
        let messages = body["messages"].as_array().unwrap();

        assert_eq!(messages[0]["role"], "assistant");
        assert!(messages[0]["content"].is_null());
        assert_eq!(messages[0]["tool_calls"][0]["id"], "call_1");
        assert_eq!(messages[0]["tool_calls"][0]["function"]["arguments"], "{\"name\":\"Jane\"}");
        assert_eq!(messages[1]["role"], "tool");
        assert_eq!(messages[1]["tool_call_id"], "call_1");
    }

    #[test]
    fn object_arguments_are_reencoded_as_string() {
        let mut record = ToolCallRecord::function("c", "update_extraction", &json!({}));
        record.function.arguments = json!({ "service": "roofing" });
        let message = OpenAIMessage::from_domain(&Message::assistant_with_tool_calls(None, vec![record]));

        let calls = message.tool_calls.unwrap();
        assert_eq!(calls[0].function.arguments, "{\"service\":\"roofing\"}");
    }

    #[test]
    fn parses_tool_call_response() {
        let raw = json!({
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {
                            "name": "update_extraction",
                            "arguments": "{\"name\":\"Jane\",\"address\":\"12 Oak St\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": { "prompt_tokens": 1000, "completion_tokens": 20 }
        });

        let parsed: OpenAIResponse = serde_json::from_value(raw).unwrap();
        let completion = provider("gpt-4o").into_completion(parsed).unwrap();

        assert_eq!(completion.finish_reason, FinishReason::ToolCalls);
        assert_eq!(completion.message.role, Role::Assistant);
        assert!(completion.message.text().is_none());
        assert_eq!(completion.message.tool_calls()[0].id, "call_abc");
        assert_eq!(completion.usage.total_tokens, 1020);
    }

    #[test]
    fn parses_plain_text_response() {
        let raw = json!({
            "model": "gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": "What's your address?" },
                "finish_reason": "stop"
            }]
        });

        let parsed: OpenAIResponse = serde_json::from_value(raw).unwrap();
        let completion = provider("gpt-4o").into_completion(parsed).unwrap();

        assert_eq!(completion.message.text(), Some("What's your address?"));
        assert!(!completion.message.has_tool_calls());
        assert_eq!(completion.usage, TokenUsage::zero());
    }

    #[test]
    fn empty_choices_is_parse_error() {
        let parsed: OpenAIResponse =
            serde_json::from_value(json!({ "model": "gpt-4o", "choices": [] })).unwrap();
        assert!(matches!(
            provider("gpt-4o").into_completion(parsed),
            Err(AIError::Parse(_))
        ));
    }

    #[test]
    fn usage_carries_estimated_cost() {
        let raw = json!({
            "model": "gpt-4o",
            "choices": [{
                "message": { "role": "assistant", "content": "Thanks!" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 1_000_000, "completion_tokens": 100_000 }
        });

        let parsed: OpenAIResponse = serde_json::from_value(raw).unwrap();
        let completion = provider("gpt-4o").into_completion(parsed).unwrap();

        // 250 cents per 1M prompt tokens, 1000 per 1M completion tokens
        assert_eq!(completion.usage.estimated_cost_cents, 350);
    }

    #[test]
    fn cheaper_models_cost_less() {
        assert_eq!(provider("gpt-3.5-turbo").calculate_cost(100_000, 100_000), 20);
        assert_eq!(provider("gpt-4o-mini").calculate_cost(1_000_000, 0), 15);
    }

    #[test]
    fn provider_info_names_model() {
        let info = provider("gpt-4o-mini").provider_info();
        assert_eq!(info, ProviderInfo::new("openai", "gpt-4o-mini"));
    }
}
