//! WebSocket message types for the voice stream.
//!
//! - Client → Server: `{ "text": "..." }`
//! - Server → Client: `audio`, `update_data`, `status`, `success`

use serde::{Deserialize, Serialize};

use crate::application::handlers::intake::SessionEvent;
use crate::domain::foundation::LeadId;
use crate::domain::intake::{ExtractionState, ExtractionUpdate};

/// Notice sent while a turn is in flight.
pub const PROCESSING_NOTICE: &str = "Processing...";

// ════════════════════════════════════════════════════════════════════════════════
// Client → Server Messages
// ════════════════════════════════════════════════════════════════════════════════

/// Inbound frame carrying one transcribed utterance.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamClientMessage {
    #[serde(default)]
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Server → Client Messages
// ════════════════════════════════════════════════════════════════════════════════

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamServerMessage {
    /// Reply text to speak.
    Audio { text: String },
    /// Fields reported during the last turn.
    UpdateData { data: ExtractionUpdate },
    /// Transient progress or error notice.
    Status { message: String },
    /// Scheduling fired.
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lead_id: Option<LeadId>,
        data: ExtractionState,
    },
}

impl StreamServerMessage {
    pub fn status(message: impl Into<String>) -> Self {
        StreamServerMessage::Status {
            message: message.into(),
        }
    }
}

impl From<SessionEvent> for StreamServerMessage {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::Audio { text } => StreamServerMessage::Audio { text },
            SessionEvent::UpdateData { data } => StreamServerMessage::UpdateData { data },
            SessionEvent::Status { message } => StreamServerMessage::Status { message },
            SessionEvent::Success { lead_id, data } => StreamServerMessage::Success { lead_id, data },
        }
    }
}
