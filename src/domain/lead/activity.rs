//! Debug log entries written to the best-effort activity side channel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SessionId, Timestamp};

/// Name of the counter bumped once per streaming session start.
pub const CALL_VOLUME_COUNTER: &str = "call_volume";

/// Type tag of a debug log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    SessionStarted,
    UserUtterance,
    AssistantReply,
    ToolCall,
    LeadCommitted,
    TurnFailed,
}

impl LogKind {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::SessionStarted => "session_started",
            LogKind::UserUtterance => "user_utterance",
            LogKind::AssistantReply => "assistant_reply",
            LogKind::ToolCall => "tool_call",
            LogKind::LeadCommitted => "lead_committed",
            LogKind::TurnFailed => "turn_failed",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One debug log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub session_id: SessionId,
    pub kind: LogKind,
    pub content: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

impl DebugLogEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        session_id: SessionId,
        kind: LogKind,
        content: impl Into<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            session_id,
            kind,
            content: content.into(),
            metadata,
            created_at: Timestamp::now(),
        }
    }
}
