//! Tool definition - schema and metadata for a tool.
//!
//! Defines the interface of an action the completion engine can invoke.

use serde::{Deserialize, Serialize};

/// Definition of a tool that can be invoked by the model.
///
/// # Examples
///
/// ```ignore
/// use lead_intake::domain::intake::tools::ToolDefinition;
///
/// let definition = ToolDefinition::new(
///     "update_extraction",
///     "Record details the caller provided",
///     serde_json::json!({
///         "type": "object",
///         "properties": {
///             "name": { "type": "string" }
///         }
///     }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "schedule_appointment")
    name: String,

    /// Human-readable description shown to the model
    description: String,

    /// JSON Schema for the arguments
    parameters_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Names of arguments the schema marks as required.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.parameters_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default()
    }

    /// Converts to the chat-completions `tools` entry format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolDefinition {
        ToolDefinition::new(
            "schedule_appointment",
            "Book the visit",
            serde_json::json!({
                "type": "object",
                "required": ["summary"],
                "properties": { "summary": { "type": "string" } }
            }),
        )
    }

    #[test]
    fn getters_return_values() {
        let def = sample();
        assert_eq!(def.name(), "schedule_appointment");
        assert_eq!(def.description(), "Book the visit");
        assert_eq!(def.parameters_schema()["type"], "object");
    }

    #[test]
    fn required_parameters_reads_schema() {
        assert_eq!(sample().required_parameters(), vec!["summary"]);
    }

    #[test]
    fn openai_format_wraps_function() {
        let json = sample().to_openai_format();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "schedule_appointment");
        assert_eq!(json["function"]["parameters"]["required"][0], "summary");
    }
}
