//! Intake domain - the dialogue/extraction model.
//!
//! - [`ExtractionState`] / [`ExtractionUpdate`] - the three collected fields
//!   and their last-write-wins merge
//! - [`Message`] - transcript entries in chat-completions shape
//! - [`recover`] - rebuilds state from a transcript
//! - [`SchedulingPolicy`] - gate for the terminal action
//! - [`tools`] - the tool schema registry and canonical tool calls

mod extraction;
mod message;
mod policy;
pub mod prompts;
mod recoverer;
pub mod tools;

pub use extraction::{ExtractionField, ExtractionState, ExtractionUpdate, UNKNOWN_FIELD};
pub use message::{FunctionCall, Message, Role, ToolCallRecord};
pub use policy::{SchedulingDecision, SchedulingPolicy};
pub use recoverer::{extraction_updates, recover};
