//! Intake tools - schema registry and canonical tool-call parsing.
//!
//! ## Key Types
//!
//! - [`ToolDefinition`] - Schema and metadata for a tool
//! - [`ToolRegistry`] - Ordered set of tools offered to the model
//! - [`ToolCall`] - Canonical, parsed tool invocation
//! - [`IntakeAction`] - What a well-formed call asks for

mod definitions;
mod tool_call;
mod tool_definition;
mod tool_registry;

pub use definitions::{
    schedule_appointment_tool, update_extraction_tool, ScheduleAppointmentParams,
    SCHEDULE_APPOINTMENT, UPDATE_EXTRACTION,
};
pub use tool_call::{IntakeAction, ToolCall, ToolCallError};
pub use tool_definition::ToolDefinition;
pub use tool_registry::{ToolRegistry, INTAKE_TOOLS};
