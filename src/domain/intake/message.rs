//! Transcript entries exchanged with the completion engine.
//!
//! The shape mirrors the chat-completions wire format so that client-supplied
//! history can be deserialized directly and forwarded without translation.

use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions (guides model behavior).
    System,
    /// End user utterance.
    User,
    /// Model output, possibly carrying tool calls.
    Assistant,
    /// Result of a tool call, linked by `tool_call_id`.
    Tool,
}

/// Function half of a tool-call record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Registered tool name.
    pub name: String,
    /// Arguments as reported by the model. Usually a JSON-encoded string,
    /// but clients replaying history may send an already-decoded object.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// A tool invocation as it appears inside an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Opaque id, unique within its assistant message.
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCallRecord {
    /// Creates a function-call record with JSON-encoded arguments.
    pub fn function(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: &serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: serde_json::Value::String(arguments.to_string()),
            },
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn text_message(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text_message(Role::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text_message(Role::User, content)
    }

    /// Creates a plain assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text_message(Role::Assistant, content)
    }

    /// Creates an assistant message carrying tool calls.
    pub fn assistant_with_tool_calls(content: Option<String>, calls: Vec<ToolCallRecord>) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_calls: if calls.is_empty() { None } else { Some(calls) },
            tool_call_id: None,
        }
    }

    /// Creates a tool result answering the call with the given id.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Tool calls carried by this message (empty for non-assistant roles).
    pub fn tool_calls(&self) -> &[ToolCallRecord] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }

    /// True if the message carries at least one tool call.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    /// User-facing text, ignoring empty or whitespace-only content.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Tool).unwrap(), "\"tool\"");
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn plain_history_deserializes() {
        let messages: Vec<Message> = serde_json::from_value(json!([
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "Hello! What's your name?" }
        ]))
        .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text(), Some("Hello! What's your name?"));
        assert!(!messages[1].has_tool_calls());
    }

    #[test]
    fn tool_call_history_deserializes_with_null_content() {
        let message: Message = serde_json::from_value(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": { "name": "update_extraction", "arguments": "{\"name\":\"Jane\"}" }
            }]
        }))
        .unwrap();

        assert!(message.content.is_none());
        assert_eq!(message.tool_calls().len(), 1);
        assert_eq!(message.tool_calls()[0].name(), "update_extraction");
    }

    #[test]
    fn tool_calls_null_is_treated_as_none() {
        let message: Message =
            serde_json::from_value(json!({ "role": "assistant", "content": "ok", "tool_calls": null }))
                .unwrap();
        assert!(message.tool_calls().is_empty());
    }

    #[test]
    fn function_record_encodes_arguments_as_string() {
        let record = ToolCallRecord::function("call_9", "update_extraction", &json!({ "name": "Jane" }));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["arguments"], "{\"name\":\"Jane\"}");
    }

    #[test]
    fn tool_result_links_back_to_call() {
        let result = Message::tool_result("call_1", "Success");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({ "role": "tool", "content": "Success", "tool_call_id": "call_1" }));
    }

    #[test]
    fn whitespace_content_is_not_text() {
        let message = Message::assistant("   ");
        assert!(message.text().is_none());
    }

    #[test]
    fn assistant_without_calls_omits_tool_calls_field() {
        let message = Message::assistant_with_tool_calls(Some("hey".into()), Vec::new());
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("tool_calls").is_none());
    }
}
