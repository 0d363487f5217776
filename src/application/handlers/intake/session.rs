//! Streaming intake session - the long-lived conversation behind a socket.
//!
//! The session owns its transcript and extraction state exclusively. The
//! transport drives it strictly sequentially: `handle_utterance` takes
//! `&mut self`, so a second turn cannot start while one is outstanding.

use serde_json::json;
use std::sync::Arc;

use super::{
    validate_utterance, ActivityRecorder, DialogueTurnEngine, TurnError, TurnInput,
    DEFAULT_MAX_MESSAGE_LENGTH,
};
use crate::domain::foundation::{LeadId, SessionId};
use crate::domain::intake::{ExtractionState, ExtractionUpdate, Message};
use crate::domain::lead::LogKind;

/// Events a session emits toward its client.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Text to be spoken or displayed.
    Audio { text: String },
    /// Fields reported during the last turn.
    UpdateData { data: ExtractionUpdate },
    /// Transient progress or error notice.
    Status { message: String },
    /// Scheduling fired.
    Success {
        lead_id: Option<LeadId>,
        data: ExtractionState,
    },
}

/// In-memory state of one streaming conversation.
pub struct IntakeSession {
    id: SessionId,
    engine: Arc<DialogueTurnEngine>,
    activity: ActivityRecorder,
    greeting: String,
    transcript: Vec<Message>,
    state: ExtractionState,
    max_message_length: usize,
    completed: bool,
}

impl IntakeSession {
    /// Creates a session whose transcript is seeded with the greeting.
    pub fn new(
        engine: Arc<DialogueTurnEngine>,
        activity: ActivityRecorder,
        greeting: impl Into<String>,
    ) -> Self {
        let greeting = greeting.into();
        Self {
            id: SessionId::new(),
            engine,
            activity,
            transcript: vec![Message::assistant(greeting.clone())],
            greeting,
            state: ExtractionState::empty(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            completed: false,
        }
    }

    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    /// True once a lead has been scheduled in this session.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Counts the call and returns the opening events.
    pub async fn start(&mut self) -> Vec<SessionEvent> {
        let call_volume = self.activity.count_call().await;
        self.activity
            .record(
                self.id,
                LogKind::SessionStarted,
                self.greeting.as_str(),
                json!({ "call_volume": call_volume }),
            )
            .await;

        tracing::info!(session_id = %self.id, "intake session started");

        vec![SessionEvent::Audio {
            text: self.greeting.clone(),
        }]
    }

    /// Runs one turn for an inbound utterance.
    ///
    /// Invalid input yields a `Status` notice and leaves the session intact.
    /// On success the transcript and state advance together.
    ///
    /// # Errors
    ///
    /// Returns the turn error unchanged; the session is not mutated.
    pub async fn handle_utterance(&mut self, raw: &str) -> Result<Vec<SessionEvent>, TurnError> {
        let text = match validate_utterance(raw, self.max_message_length) {
            Ok(text) => text,
            Err(err) => {
                return Ok(vec![SessionEvent::Status {
                    message: err.to_string(),
                }])
            }
        };

        let outcome = match self
            .engine
            .run_turn(TurnInput::new(self.id, &self.state, &self.transcript, text))
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.activity.record_failure(self.id, text, &err).await;
                return Err(err);
            }
        };

        self.activity.record_turn(self.id, text, &outcome).await;

        self.transcript.extend(outcome.appended);
        self.state = outcome.updated_state;

        let mut events = Vec::with_capacity(3);
        if !outcome.extraction_delta.is_empty() {
            events.push(SessionEvent::UpdateData {
                data: outcome.extraction_delta,
            });
        }
        events.push(SessionEvent::Audio {
            text: outcome.reply_text,
        });
        if outcome.terminal {
            self.completed = true;
            events.push(SessionEvent::Success {
                lead_id: outcome.lead_id,
                data: self.state.clone(),
            });
        }

        Ok(events)
    }
}
