//! SimulateStep command handler - the stateless step adapter.
//!
//! Every call carries the full client-held transcript. Extraction state is
//! recovered from it fresh, so two identical calls see identical state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::{
    validate_utterance, ActivityRecorder, DialogueTurnEngine, TurnError, TurnInput,
    UtteranceError,
};
use crate::domain::foundation::{LeadId, SessionId};
use crate::domain::intake::{recover, ExtractionUpdate, Message};

/// Default upper bound on utterance length, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 10_000;

/// Command to advance a client-held conversation by one turn.
#[derive(Debug, Clone)]
pub struct SimulateStepCommand {
    /// Prior transcript as held by the client.
    pub messages: Vec<Message>,
    /// New user utterance.
    pub text: String,
}

/// Status tag reported to stateless clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Dialogue continues.
    Interacting,
    /// Scheduling fired this turn.
    Success,
    /// The turn failed.
    Error,
}

/// Result of a successful step.
#[derive(Debug, Clone)]
pub struct SimulateStepResult {
    pub text: String,
    /// Fields reported during this turn only.
    pub extracted: ExtractionUpdate,
    pub status: StepStatus,
    /// Transcript entries this turn appended.
    pub appended: Vec<Message>,
    pub lead_id: Option<LeadId>,
}

/// Errors that can occur when running a step.
#[derive(Debug, Error)]
pub enum SimulateStepError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] UtteranceError),

    #[error(transparent)]
    Turn(#[from] TurnError),
}

/// Handler for SimulateStep commands.
pub struct SimulateStepHandler {
    engine: Arc<DialogueTurnEngine>,
    activity: ActivityRecorder,
    max_message_length: usize,
}

impl SimulateStepHandler {
    pub fn new(engine: Arc<DialogueTurnEngine>, activity: ActivityRecorder) -> Self {
        Self {
            engine,
            activity,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
        }
    }

    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// Handles a step command.
    pub async fn handle(
        &self,
        cmd: SimulateStepCommand,
    ) -> Result<SimulateStepResult, SimulateStepError> {
        let text = validate_utterance(&cmd.text, self.max_message_length)?;

        // Stateless calls have no session; a fresh id correlates this turn's logs.
        let session_id = SessionId::new();
        let state = recover(&cmd.messages);

        tracing::debug!(
            session_id = %session_id,
            history_len = cmd.messages.len(),
            "running stateless step"
        );

        let outcome = match self
            .engine
            .run_turn(TurnInput::new(session_id, &state, &cmd.messages, text))
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.activity.record_failure(session_id, text, &err).await;
                return Err(err.into());
            }
        };

        self.activity.record_turn(session_id, text, &outcome).await;

        Ok(SimulateStepResult {
            status: if outcome.terminal {
                StepStatus::Success
            } else {
                StepStatus::Interacting
            },
            text: outcome.reply_text,
            extracted: outcome.extraction_delta,
            appended: outcome.appended,
            lead_id: outcome.lead_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::{InMemoryActivityLog, InMemoryLeadStore};
    use crate::application::handlers::intake::LeadCommitter;
    use crate::domain::intake::ToolCallRecord;
    use crate::domain::lead::LogKind;
    use serde_json::json;

    fn handler(provider: &MockAIProvider, log: &InMemoryActivityLog) -> SimulateStepHandler {
        let engine = DialogueTurnEngine::new(
            Arc::new(provider.clone()),
            LeadCommitter::new(Arc::new(InMemoryLeadStore::new())),
        );
        SimulateStepHandler::new(Arc::new(engine), ActivityRecorder::new(Arc::new(log.clone())))
    }

    fn command(messages: Vec<Message>, text: &str) -> SimulateStepCommand {
        SimulateStepCommand {
            messages,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_engine_call() {
        let provider = MockAIProvider::new();
        let result = handler(&provider, &InMemoryActivityLog::new())
            .handle(command(Vec::new(), "   "))
            .await;

        assert!(matches!(
            result,
            Err(SimulateStepError::InvalidInput(UtteranceError::Empty))
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn over_length_text_is_rejected() {
        let provider = MockAIProvider::new();
        let result = handler(&provider, &InMemoryActivityLog::new())
            .with_max_message_length(4)
            .handle(command(Vec::new(), "hello"))
            .await;

        assert!(matches!(
            result,
            Err(SimulateStepError::InvalidInput(UtteranceError::TooLong { max: 4 }))
        ));
    }

    #[tokio::test]
    async fn reports_delta_not_accumulated_state() {
        let history = vec![Message::assistant_with_tool_calls(
            None,
            vec![ToolCallRecord::function("h1", "update_extraction", &json!({ "name": "Jane" }))],
        )];
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![("update_extraction", json!({ "service": "roofing" }))])
            .with_text("And the address?");

        let result = handler(&provider, &InMemoryActivityLog::new())
            .handle(command(history, "roofing"))
            .await
            .unwrap();

        assert_eq!(result.status, StepStatus::Interacting);
        assert_eq!(result.extracted.service.as_deref(), Some("roofing"));
        assert!(result.extracted.name.is_none());
        assert_eq!(result.text, "And the address?");
    }

    #[tokio::test]
    async fn failure_is_logged_and_returned() {
        let provider = MockAIProvider::new().with_error(MockError::NotConfigured);
        let log = InMemoryActivityLog::new();

        let result = handler(&provider, &log).handle(command(Vec::new(), "hi")).await;

        assert!(matches!(
            result,
            Err(SimulateStepError::Turn(TurnError::Configuration(_)))
        ));
        assert_eq!(log.entries().await[0].kind, LogKind::TurnFailed);
    }
}
