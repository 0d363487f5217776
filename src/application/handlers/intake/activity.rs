//! Best-effort activity side channel.
//!
//! Debug logs and the call-volume counter are written inline but never
//! allowed to influence a turn: every failure is logged and dropped.

use serde_json::json;
use std::sync::Arc;

use super::{TurnError, TurnOutcome};
use crate::domain::foundation::SessionId;
use crate::domain::lead::{DebugLogEntry, LogKind, CALL_VOLUME_COUNTER};
use crate::ports::ActivityLog;

/// Records session activity to an optional activity log.
#[derive(Clone, Default)]
pub struct ActivityRecorder {
    log: Option<Arc<dyn ActivityLog>>,
}

impl ActivityRecorder {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self { log: Some(log) }
    }

    /// A recorder that drops everything.
    pub fn disabled() -> Self {
        Self { log: None }
    }

    /// Appends one debug log entry.
    pub async fn record(
        &self,
        session_id: SessionId,
        kind: LogKind,
        content: impl Into<String>,
        metadata: serde_json::Value,
    ) {
        let Some(log) = &self.log else {
            return;
        };

        let entry = DebugLogEntry::new(session_id, kind, content, metadata);
        if let Err(err) = log.append(&entry).await {
            tracing::warn!(session_id = %session_id, kind = %kind, error = %err, "debug log write dropped");
        }
    }

    /// Bumps the call-volume counter, returning the new value when known.
    pub async fn count_call(&self) -> Option<i64> {
        let log = self.log.as_ref()?;
        match log.increment_counter(CALL_VOLUME_COUNTER).await {
            Ok(value) => {
                tracing::debug!(call_volume = value, "call volume incremented");
                Some(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "call volume increment dropped");
                None
            }
        }
    }

    /// Logs the utterance, tool calls, commit and reply of a completed turn.
    pub async fn record_turn(&self, session_id: SessionId, user_text: &str, outcome: &TurnOutcome) {
        if self.log.is_none() {
            return;
        }

        self.record(session_id, LogKind::UserUtterance, user_text, json!({}))
            .await;

        for call in &outcome.tool_calls {
            self.record(
                session_id,
                LogKind::ToolCall,
                call.name(),
                json!({ "tool": call.name(), "arguments": call.arguments() }),
            )
            .await;
        }

        if let Some(lead_id) = outcome.lead_id {
            self.record(
                session_id,
                LogKind::LeadCommitted,
                lead_id.to_string(),
                json!({ "lead_id": lead_id, "state": outcome.updated_state }),
            )
            .await;
        }

        self.record(
            session_id,
            LogKind::AssistantReply,
            outcome.reply_text.as_str(),
            json!({
                "delta": outcome.extraction_delta,
                "terminal": outcome.terminal,
                "prompt_tokens": outcome.usage.prompt_tokens,
                "completion_tokens": outcome.usage.completion_tokens,
                "total_tokens": outcome.usage.total_tokens,
                "estimated_cost_cents": outcome.usage.estimated_cost_cents,
            }),
        )
        .await;
    }

    /// Logs a failed turn.
    pub async fn record_failure(&self, session_id: SessionId, user_text: &str, err: &TurnError) {
        self.record(
            session_id,
            LogKind::TurnFailed,
            err.to_string(),
            json!({ "user_text": user_text }),
        )
        .await;
    }
}
