//! Canonical tool call and the intake actions it decodes into.
//!
//! Tool-call records arrive in whatever shape the model or a replaying client
//! produced (arguments as an encoded string, as an object, or missing).
//! [`ToolCall::from_record`] normalises them once; everything downstream
//! works on the canonical form only.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::definitions::{ScheduleAppointmentParams, SCHEDULE_APPOINTMENT, UPDATE_EXTRACTION};
use crate::domain::intake::{ExtractionUpdate, ToolCallRecord};

/// Why a tool call could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolCallError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("malformed arguments for '{tool}': {reason}")]
    MalformedArguments { tool: String, reason: String },
}

impl ToolCallError {
    fn malformed(tool: &str, reason: impl ToString) -> Self {
        ToolCallError::MalformedArguments {
            tool: tool.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A decoded tool invocation with its arguments parsed into a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    id: String,
    name: String,
    arguments: serde_json::Value,
}

/// What a well-formed tool call asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeAction {
    UpdateExtraction(ExtractionUpdate),
    ScheduleAppointment(ScheduleAppointmentParams),
}

impl ToolCall {
    /// Creates a tool call from already-parsed arguments.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Normalises a transcript record into a canonical call.
    ///
    /// # Errors
    ///
    /// Returns `MalformedArguments` when the arguments are not a JSON object
    /// (or a string encoding one).
    pub fn from_record(record: &ToolCallRecord) -> Result<Self, ToolCallError> {
        let name = record.function.name.as_str();
        let arguments = match &record.function.arguments {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            serde_json::Value::String(encoded) if encoded.trim().is_empty() => {
                serde_json::Value::Object(Default::default())
            }
            serde_json::Value::String(encoded) => serde_json::from_str(encoded)
                .map_err(|e| ToolCallError::malformed(name, e))?,
            other => other.clone(),
        };

        if !arguments.is_object() {
            return Err(ToolCallError::malformed(name, "arguments are not an object"));
        }

        Ok(Self::new(record.id.clone(), name, arguments))
    }

    /// Returns the call id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parsed arguments.
    pub fn arguments(&self) -> &serde_json::Value {
        &self.arguments
    }

    /// Decodes the call into an intake action.
    ///
    /// # Errors
    ///
    /// `UnknownTool` for unregistered names, `MalformedArguments` when the
    /// arguments do not match the tool's schema.
    pub fn action(&self) -> Result<IntakeAction, ToolCallError> {
        match self.name.as_str() {
            UPDATE_EXTRACTION => self.decode().map(IntakeAction::UpdateExtraction),
            SCHEDULE_APPOINTMENT => self.decode().map(IntakeAction::ScheduleAppointment),
            other => Err(ToolCallError::UnknownTool(other.to_string())),
        }
    }

    /// Decodes the call as an extraction update.
    pub fn extraction_update(&self) -> Result<ExtractionUpdate, ToolCallError> {
        match self.action()? {
            IntakeAction::UpdateExtraction(update) => Ok(update),
            IntakeAction::ScheduleAppointment(_) => Err(ToolCallError::malformed(
                &self.name,
                "not an extraction update",
            )),
        }
    }

    fn decode<T: DeserializeOwned>(&self) -> Result<T, ToolCallError> {
        serde_json::from_value(self.arguments.clone())
            .map_err(|e| ToolCallError::malformed(&self.name, e))
    }
}
