//! Tool Registry - the set of tools offered to the completion engine.
//!
//! # Example
//!
//! ```
//! use lead_intake::domain::intake::tools::{ToolRegistry, UPDATE_EXTRACTION};
//!
//! let registry = ToolRegistry::intake();
//! assert!(registry.contains(UPDATE_EXTRACTION));
//! assert_eq!(registry.definitions().len(), 2);
//! ```

use once_cell::sync::Lazy;

use super::definitions::{schedule_appointment_tool, update_extraction_tool};
use super::ToolDefinition;

/// Shared registry holding the intake tools.
pub static INTAKE_TOOLS: Lazy<ToolRegistry> = Lazy::new(ToolRegistry::intake);

/// Ordered collection of tool definitions.
///
/// Order is preserved so the schema sent to the model is stable across
/// requests.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with `update_extraction` and `schedule_appointment`.
    pub fn intake() -> Self {
        let mut registry = Self::new();
        registry.register(update_extraction_tool());
        registry.register(schedule_appointment_tool());
        registry
    }

    /// Registers a tool, replacing any earlier definition with the same name.
    pub fn register(&mut self, definition: ToolDefinition) {
        match self.tools.iter_mut().find(|t| t.name() == definition.name()) {
            Some(existing) => *existing = definition,
            None => self.tools.push(definition),
        }
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Returns true if a tool with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All definitions, in registration order.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Definitions in chat-completions `tools` format.
    pub fn to_openai_tools(&self) -> Vec<serde_json::Value> {
        self.tools.iter().map(ToolDefinition::to_openai_format).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::tools::{SCHEDULE_APPOINTMENT, UPDATE_EXTRACTION};

    #[test]
    fn intake_registry_has_both_tools_in_order() {
        let registry = ToolRegistry::intake();
        let names: Vec<_> = registry.definitions().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec![UPDATE_EXTRACTION, SCHEDULE_APPOINTMENT]);
    }

    #[test]
    fn register_replaces_duplicate_names() {
        let mut registry = ToolRegistry::intake();
        registry.register(ToolDefinition::new(
            UPDATE_EXTRACTION,
            "replacement",
            serde_json::json!({"type": "object"}),
        ));

        assert_eq!(registry.definitions().len(), 2);
        assert_eq!(registry.get(UPDATE_EXTRACTION).unwrap().description(), "replacement");
    }

    #[test]
    fn unknown_tool_is_absent() {
        assert!(!INTAKE_TOOLS.contains("send_sms"));
    }

    #[test]
    fn openai_tools_are_function_entries() {
        let tools = INTAKE_TOOLS.to_openai_tools();
        assert_eq!(tools.len(), 2);
        assert!(tools.iter().all(|t| t["type"] == "function"));
    }
}
