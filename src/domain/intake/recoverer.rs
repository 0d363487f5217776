//! State recovery - rebuilds extraction state from a transcript.
//!
//! Replays every `update_extraction` call found on assistant messages, in
//! transcript order. Recovery is a pure fold: it has no side effects apart
//! from logging skipped entries, so the stateless adapter can run it on
//! every request.

use super::tools::{ToolCall, UPDATE_EXTRACTION};
use super::{ExtractionState, ExtractionUpdate, Message, Role};

/// Reconstructs the accumulated extraction state of a transcript.
///
/// Calls with malformed arguments are skipped and logged; one corrupt
/// historical entry never prevents recovery of the rest.
pub fn recover(transcript: &[Message]) -> ExtractionState {
    extraction_updates(transcript).fold(ExtractionState::empty(), |state, update| {
        state.merged(&update)
    })
}

/// Lazily yields every well-formed extraction update in transcript order.
pub fn extraction_updates(transcript: &[Message]) -> impl Iterator<Item = ExtractionUpdate> + '_ {
    transcript
        .iter()
        .filter(|message| message.role == Role::Assistant)
        .flat_map(|message| message.tool_calls().iter())
        .filter(|record| record.name() == UPDATE_EXTRACTION)
        .filter_map(|record| {
            match ToolCall::from_record(record).and_then(|call| call.extraction_update()) {
                Ok(update) => Some(update),
                Err(err) => {
                    tracing::warn!(
                        tool_call_id = %record.id,
                        error = %err,
                        "Skipping malformed extraction call during recovery"
                    );
                    None
                }
            }
        })
}
