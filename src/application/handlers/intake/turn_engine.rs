//! Dialogue turn engine.
//!
//! Runs one turn of the intake dialogue: one user utterance in, one reply
//! out, with every tool call the model issued resolved in between.
//!
//! # Stages
//!
//! ```text
//! AwaitingModel ──(no tool calls)──────────────────────────────► Done
//!       │
//!       └──(tool calls)── resolve ──(text present)─────────────► Done
//!                            │
//!                            └──(silent)──► AwaitingFollowUp ──► Done
//! ```
//!
//! At most two completion calls are made per turn. A failure of the first
//! call aborts the turn before anything is committed; a failure of the
//! follow-up falls back to a fixed reply because extraction updates and a
//! possible lead commit have already happened.

use std::sync::Arc;
use thiserror::Error;

use super::LeadCommitter;
use crate::domain::foundation::{LeadId, SessionId};
use crate::domain::intake::prompts::{
    scheduling_declined, tool_rejected, FOLLOW_UP_FALLBACK, SYSTEM_INSTRUCTION,
    TOOL_ACKNOWLEDGEMENT,
};
use crate::domain::intake::tools::{IntakeAction, ToolCall, ToolRegistry, INTAKE_TOOLS};
use crate::domain::intake::{
    ExtractionState, ExtractionUpdate, Message, SchedulingDecision, SchedulingPolicy,
    ToolCallRecord,
};
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata, TokenUsage};

/// Errors that abort a turn. Nothing is committed when one is returned.
#[derive(Debug, Error)]
pub enum TurnError {
    /// The completion engine is missing or rejected our credentials.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The first completion call failed.
    #[error("completion failed: {0}")]
    Completion(#[source] AIError),
}

impl From<AIError> for TurnError {
    fn from(err: AIError) -> Self {
        if err.is_configuration_error() {
            TurnError::Configuration(err.to_string())
        } else {
            TurnError::Completion(err)
        }
    }
}

/// Why an inbound utterance was rejected before reaching the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtteranceError {
    #[error("message text cannot be empty")]
    Empty,

    #[error("message text exceeds {max} characters")]
    TooLong { max: usize },
}

/// Trims an utterance and checks it against the length limit.
pub fn validate_utterance(raw: &str, max_len: usize) -> Result<&str, UtteranceError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(UtteranceError::Empty);
    }
    if text.chars().count() > max_len {
        return Err(UtteranceError::TooLong { max: max_len });
    }
    Ok(text)
}

/// Inputs of one turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnInput<'a> {
    pub session_id: SessionId,
    pub prior_state: &'a ExtractionState,
    pub transcript: &'a [Message],
    pub user_text: &'a str,
}

impl<'a> TurnInput<'a> {
    pub fn new(
        session_id: SessionId,
        prior_state: &'a ExtractionState,
        transcript: &'a [Message],
        user_text: &'a str,
    ) -> Self {
        Self {
            session_id,
            prior_state,
            transcript,
            user_text,
        }
    }
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Text to speak or display.
    pub reply_text: String,
    /// Fields reported by `update_extraction` during this turn only.
    pub extraction_delta: ExtractionUpdate,
    /// True when `schedule_appointment` was honored.
    pub terminal: bool,
    /// Prior state with this turn's updates merged in.
    pub updated_state: ExtractionState,
    /// Committed lead, if the store accepted it.
    pub lead_id: Option<LeadId>,
    /// Transcript entries produced by this turn, in order, starting with the
    /// user message.
    pub appended: Vec<Message>,
    /// Well-formed tool calls issued by the model.
    pub tool_calls: Vec<ToolCall>,
    /// Token usage across both completion calls.
    pub usage: TokenUsage,
}

/// Position of a turn in its bounded state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    AwaitingModel,
    AwaitingFollowUp,
    Done,
}

/// Mutable bookkeeping carried through the stages of one turn.
struct TurnProgress {
    outbound: Vec<Message>,
    appended: Vec<Message>,
    state: ExtractionState,
    delta: ExtractionUpdate,
    terminal: bool,
    lead_id: Option<LeadId>,
    tool_calls: Vec<ToolCall>,
    usage: TokenUsage,
    reply: Option<String>,
}

/// One tool call after resolution, ready to be answered.
struct Resolved<'a> {
    record: &'a ToolCallRecord,
    parsed: Result<(ToolCall, IntakeAction), String>,
    result: Option<String>,
}

/// Runs turns of the intake dialogue against a completion engine.
pub struct DialogueTurnEngine {
    provider: Arc<dyn AIProvider>,
    committer: LeadCommitter,
    tools: ToolRegistry,
    policy: SchedulingPolicy,
    temperature: Option<f32>,
}

impl DialogueTurnEngine {
    /// Creates an engine offering the intake tools with the permissive policy.
    pub fn new(provider: Arc<dyn AIProvider>, committer: LeadCommitter) -> Self {
        Self {
            provider,
            committer,
            tools: INTAKE_TOOLS.clone(),
            policy: SchedulingPolicy::default(),
            temperature: None,
        }
    }

    /// Sets the scheduling policy.
    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the sampling temperature for both completion calls.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Runs one turn.
    ///
    /// # Errors
    ///
    /// - `Configuration` if the engine is unconfigured or unauthorized
    /// - `Completion` if the first completion call fails
    pub async fn run_turn(&self, input: TurnInput<'_>) -> Result<TurnOutcome, TurnError> {
        let user_message = Message::user(input.user_text);

        let mut outbound = Vec::with_capacity(input.transcript.len() + 2);
        outbound.push(Message::system(SYSTEM_INSTRUCTION));
        outbound.extend(input.transcript.iter().cloned());
        outbound.push(user_message.clone());

        let mut progress = TurnProgress {
            outbound,
            appended: vec![user_message],
            state: input.prior_state.clone(),
            delta: ExtractionUpdate::default(),
            terminal: false,
            lead_id: None,
            tool_calls: Vec::new(),
            usage: TokenUsage::zero(),
            reply: None,
        };

        let mut stage = TurnStage::AwaitingModel;
        loop {
            stage = match stage {
                TurnStage::AwaitingModel => self.first_pass(input.session_id, &mut progress).await?,
                TurnStage::AwaitingFollowUp => {
                    self.follow_up(input.session_id, &mut progress).await
                }
                TurnStage::Done => break,
            };
        }

        Ok(TurnOutcome {
            reply_text: progress
                .reply
                .unwrap_or_else(|| FOLLOW_UP_FALLBACK.to_string()),
            extraction_delta: progress.delta,
            terminal: progress.terminal,
            updated_state: progress.state,
            lead_id: progress.lead_id,
            appended: progress.appended,
            tool_calls: progress.tool_calls,
            usage: progress.usage,
        })
    }

    fn request(&self, session_id: SessionId, messages: Vec<Message>) -> CompletionRequest {
        let request =
            CompletionRequest::new(RequestMetadata::for_session(session_id)).with_messages(messages);
        match self.temperature {
            Some(t) => request.with_temperature(t),
            None => request,
        }
    }

    async fn first_pass(
        &self,
        session_id: SessionId,
        progress: &mut TurnProgress,
    ) -> Result<TurnStage, TurnError> {
        let request = self
            .request(session_id, progress.outbound.clone())
            .with_tools(self.tools.definitions().to_vec());

        let response = self.provider.complete(request).await.map_err(|err| {
            tracing::warn!(session_id = %session_id, error = %err, "completion call failed");
            TurnError::from(err)
        })?;
        progress.usage.accumulate(&response.usage);

        let assistant = response.message;
        let text = assistant.text().map(str::to_string);

        if !assistant.has_tool_calls() {
            progress.reply = text;
            progress.appended.push(assistant);
            return Ok(TurnStage::Done);
        }

        let results = self.resolve_tools(session_id, &assistant, progress).await;

        progress.appended.push(assistant.clone());
        progress.appended.extend(results.iter().cloned());

        match text {
            Some(text) => {
                progress.reply = Some(text);
                Ok(TurnStage::Done)
            }
            None => {
                progress.outbound.push(assistant);
                progress.outbound.extend(results);
                Ok(TurnStage::AwaitingFollowUp)
            }
        }
    }

    async fn follow_up(&self, session_id: SessionId, progress: &mut TurnProgress) -> TurnStage {
        let request = self.request(session_id, std::mem::take(&mut progress.outbound));

        let reply = match self.provider.complete(request).await {
            Ok(response) => {
                progress.usage.accumulate(&response.usage);
                response.message.text().map(str::to_string)
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %session_id,
                    error = %err,
                    "follow-up completion failed, using fallback reply"
                );
                None
            }
        };

        let reply = reply.unwrap_or_else(|| FOLLOW_UP_FALLBACK.to_string());
        progress.appended.push(Message::assistant(reply.clone()));
        progress.reply = Some(reply);
        TurnStage::Done
    }

    /// Applies every tool call of the assistant message and returns one tool
    /// result message per call, in call order.
    ///
    /// All extraction updates land before any scheduling call is evaluated,
    /// so a model that reports the last field and schedules in the same
    /// message commits the complete record.
    async fn resolve_tools(
        &self,
        session_id: SessionId,
        assistant: &Message,
        progress: &mut TurnProgress,
    ) -> Vec<Message> {
        let mut resolved: Vec<Resolved<'_>> = assistant
            .tool_calls()
            .iter()
            .map(|record| Resolved {
                record,
                parsed: ToolCall::from_record(record)
                    .and_then(|call| call.action().map(|action| (call, action)))
                    .map_err(|err| err.to_string()),
                result: None,
            })
            .collect();

        for entry in resolved.iter_mut() {
            match &entry.parsed {
                Ok((call, IntakeAction::UpdateExtraction(update))) => {
                    tracing::debug!(session_id = %session_id, tool = call.name(), "extraction updated");
                    progress.state.apply(update);
                    progress.delta.absorb(update);
                    entry.result = Some(TOOL_ACKNOWLEDGEMENT.to_string());
                }
                Ok((_, IntakeAction::ScheduleAppointment(_))) => {}
                Err(reason) => {
                    tracing::warn!(
                        session_id = %session_id,
                        tool = entry.record.name(),
                        reason = %reason,
                        "skipping unusable tool call"
                    );
                    entry.result = Some(tool_rejected(reason));
                }
            }
        }

        for entry in resolved.iter_mut() {
            let Ok((_, IntakeAction::ScheduleAppointment(params))) = &entry.parsed else {
                continue;
            };

            if progress.terminal {
                entry.result = Some(TOOL_ACKNOWLEDGEMENT.to_string());
                continue;
            }

            match self.policy.evaluate(&progress.state) {
                SchedulingDecision::Accept => {
                    progress.terminal = true;
                    progress.lead_id = self
                        .committer
                        .commit(&progress.state, Some(params.summary.as_str()))
                        .await;
                    entry.result = Some(TOOL_ACKNOWLEDGEMENT.to_string());
                }
                SchedulingDecision::Decline { missing } => {
                    let missing: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
                    tracing::info!(
                        session_id = %session_id,
                        missing = ?missing,
                        "scheduling declined by policy"
                    );
                    entry.result = Some(scheduling_declined(&missing));
                }
            }
        }

        resolved
            .into_iter()
            .map(|entry| {
                if let Ok((call, _)) = entry.parsed {
                    progress.tool_calls.push(call);
                }
                Message::tool_result(
                    entry.record.id.clone(),
                    entry
                        .result
                        .unwrap_or_else(|| TOOL_ACKNOWLEDGEMENT.to_string()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::InMemoryLeadStore;
    use crate::domain::intake::Role;
    use serde_json::json;

    fn engine(provider: &MockAIProvider, store: &InMemoryLeadStore) -> DialogueTurnEngine {
        DialogueTurnEngine::new(
            Arc::new(provider.clone()),
            LeadCommitter::new(Arc::new(store.clone())),
        )
    }

    async fn turn(
        engine: &DialogueTurnEngine,
        state: &ExtractionState,
        text: &str,
    ) -> Result<TurnOutcome, TurnError> {
        engine
            .run_turn(TurnInput::new(SessionId::new(), state, &[], text))
            .await
    }

    #[test]
    fn validate_utterance_trims_and_bounds() {
        assert_eq!(validate_utterance("  hi  ", 10), Ok("hi"));
        assert_eq!(validate_utterance("   ", 10), Err(UtteranceError::Empty));
        assert_eq!(
            validate_utterance("hello world", 5),
            Err(UtteranceError::TooLong { max: 5 })
        );
    }

    #[test]
    fn configuration_errors_map_to_configuration() {
        assert!(matches!(
            TurnError::from(AIError::not_configured("no key")),
            TurnError::Configuration(_)
        ));
        assert!(matches!(
            TurnError::from(AIError::network("reset")),
            TurnError::Completion(_)
        ));
    }

    #[tokio::test]
    async fn text_only_reply_passes_through() {
        let provider = MockAIProvider::new().with_text("What's your name?");
        let store = InMemoryLeadStore::new();

        let outcome = turn(&engine(&provider, &store), &ExtractionState::empty(), "hi")
            .await
            .unwrap();

        assert_eq!(outcome.reply_text, "What's your name?");
        assert!(outcome.extraction_delta.is_empty());
        assert!(!outcome.terminal);
        assert_eq!(outcome.appended.len(), 2);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn outbound_starts_with_system_and_ends_with_user() {
        let provider = MockAIProvider::new().with_text("ok");
        let store = InMemoryLeadStore::new();
        let history = vec![Message::assistant("Hi, what's your name?")];

        engine(&provider, &store)
            .run_turn(TurnInput::new(
                SessionId::new(),
                &ExtractionState::empty(),
                &history,
                "Jane",
            ))
            .await
            .unwrap();

        let request = &provider.get_calls()[0];
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].text(), Some("Hi, what's your name?"));
        assert_eq!(request.messages[2].role, Role::User);
        assert_eq!(request.messages[2].text(), Some("Jane"));
        assert!(request.offers_tools());
    }

    #[tokio::test]
    async fn silent_tool_turn_triggers_one_follow_up_without_tools() {
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![("update_extraction", json!({ "name": "Jane" }))])
            .with_text("Thanks Jane! What service do you need?");
        let store = InMemoryLeadStore::new();

        let outcome = turn(&engine(&provider, &store), &ExtractionState::empty(), "I'm Jane")
            .await
            .unwrap();

        assert_eq!(outcome.reply_text, "Thanks Jane! What service do you need?");
        assert_eq!(outcome.extraction_delta.name.as_deref(), Some("Jane"));
        assert_eq!(provider.call_count(), 2);

        let follow_up = &provider.get_calls()[1];
        assert!(!follow_up.offers_tools());
        let tail = &follow_up.messages[follow_up.messages.len() - 2..];
        assert!(tail[0].has_tool_calls());
        assert_eq!(tail[1].role, Role::Tool);
        assert_eq!(tail[1].tool_call_id.as_deref(), Some(tail[0].tool_calls()[0].id.as_str()));
        assert_eq!(tail[1].text(), Some(TOOL_ACKNOWLEDGEMENT));
    }

    #[tokio::test]
    async fn tool_call_with_text_skips_follow_up() {
        let provider = MockAIProvider::new().with_reply(
            Some("Got it. What's the address?"),
            vec![("update_extraction", json!({ "service": "roofing" }))],
        );
        let store = InMemoryLeadStore::new();

        let outcome = turn(&engine(&provider, &store), &ExtractionState::empty(), "roofing")
            .await
            .unwrap();

        assert_eq!(outcome.reply_text, "Got it. What's the address?");
        assert_eq!(provider.call_count(), 1);
        // user, assistant, tool result
        assert_eq!(outcome.appended.len(), 3);
    }

    #[tokio::test]
    async fn follow_up_failure_falls_back() {
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![("update_extraction", json!({ "name": "Jane" }))])
            .with_error(MockError::Unavailable {
                message: "down".into(),
            });
        let store = InMemoryLeadStore::new();

        let outcome = turn(&engine(&provider, &store), &ExtractionState::empty(), "Jane")
            .await
            .unwrap();

        assert_eq!(outcome.reply_text, FOLLOW_UP_FALLBACK);
        assert_eq!(outcome.updated_state.name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn first_call_failure_aborts_without_commit() {
        let provider = MockAIProvider::new().with_error(MockError::NotConfigured);
        let store = InMemoryLeadStore::new();

        let err = turn(&engine(&provider, &store), &ExtractionState::empty(), "hi")
            .await
            .unwrap_err();

        assert!(matches!(err, TurnError::Configuration(_)));
        assert_eq!(store.lead_count().await, 0);
    }

    #[tokio::test]
    async fn updates_apply_before_schedule_in_same_message() {
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![
                ("schedule_appointment", json!({ "summary": "Roof repair" })),
                ("update_extraction", json!({ "address": "12 Oak St" })),
            ])
            .with_text("You're booked!");
        let store = InMemoryLeadStore::new();
        let prior = ExtractionState {
            name: Some("Jane".into()),
            service: Some("roof repair".into()),
            address: None,
        };

        let outcome = turn(
            &engine(&provider, &store).with_policy(SchedulingPolicy::RequireComplete),
            &prior,
            "12 Oak St",
        )
        .await
        .unwrap();

        assert!(outcome.terminal);
        assert!(outcome.lead_id.is_some());
        assert_eq!(store.leads().await[0].address, "12 Oak St");
    }

    #[tokio::test]
    async fn repeated_schedule_commits_once() {
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![
                ("schedule_appointment", json!({ "summary": "a" })),
                ("schedule_appointment", json!({ "summary": "b" })),
            ])
            .with_text("Booked.");
        let store = InMemoryLeadStore::new();

        let outcome = turn(&engine(&provider, &store), &ExtractionState::empty(), "book it")
            .await
            .unwrap();

        assert!(outcome.terminal);
        assert_eq!(store.lead_count().await, 1);
        let tool_results: Vec<_> = outcome
            .appended
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(tool_results.len(), 2);
    }

    #[tokio::test]
    async fn declined_schedule_reports_missing_fields() {
        let provider = MockAIProvider::new()
            .with_tool_calls(vec![("schedule_appointment", json!({ "summary": "x" }))])
            .with_text("Before I book, what's your address?");
        let store = InMemoryLeadStore::new();

        let outcome = turn(
            &engine(&provider, &store).with_policy(SchedulingPolicy::RequireComplete),
            &ExtractionState::empty(),
            "book me",
        )
        .await
        .unwrap();

        assert!(!outcome.terminal);
        assert_eq!(store.lead_count().await, 0);
        let tool_result = outcome
            .appended
            .iter()
            .find(|m| m.role == Role::Tool)
            .unwrap();
        assert!(tool_result.text().unwrap().contains("name, service, address"));
    }

    #[tokio::test]
    async fn malformed_and_unknown_calls_are_skipped() {
        let mut bad = ToolCallRecord::function("bad", "update_extraction", &json!({}));
        bad.function.arguments = json!("{not json");
        let unknown = ToolCallRecord::function("u", "send_invoice", &json!({}));
        let good = ToolCallRecord::function("good", "update_extraction", &json!({ "name": "Jane" }));

        let provider = MockAIProvider::new()
            .with_message(Message::assistant_with_tool_calls(None, vec![bad, unknown, good]))
            .with_text("Thanks!");
        let store = InMemoryLeadStore::new();

        let outcome = turn(&engine(&provider, &store), &ExtractionState::empty(), "Jane")
            .await
            .unwrap();

        assert_eq!(outcome.extraction_delta.name.as_deref(), Some("Jane"));
        assert_eq!(outcome.tool_calls.len(), 1);

        let results: Vec<_> = outcome
            .appended
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].text().unwrap().starts_with("Error:"));
        assert!(results[1].text().unwrap().contains("unknown tool"));
        assert_eq!(results[2].text(), Some(TOOL_ACKNOWLEDGEMENT));
    }

    #[tokio::test]
    async fn temperature_is_forwarded() {
        let provider = MockAIProvider::new().with_text("ok");
        let store = InMemoryLeadStore::new();

        turn(
            &engine(&provider, &store).with_temperature(Some(0.3)),
            &ExtractionState::empty(),
            "hi",
        )
        .await
        .unwrap();

        assert_eq!(provider.get_calls()[0].temperature, Some(0.3));
    }
}
