//! HTTP handlers for the intake endpoints.
//!
//! These handlers connect Axum routes to the intake application layer.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};

use crate::application::handlers::intake::{
    ActivityRecorder, DialogueTurnEngine, IntakeSession, SimulateStepCommand, SimulateStepError,
    SimulateStepHandler, TurnError, DEFAULT_MAX_MESSAGE_LENGTH,
};
use crate::domain::intake::prompts::DEFAULT_GREETING;

use super::dto::{HealthResponse, SimulateStepRequest, SimulateStepResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for intake handlers.
#[derive(Clone)]
pub struct IntakeAppState {
    engine: Arc<DialogueTurnEngine>,
    activity: ActivityRecorder,
    greeting: Arc<str>,
    max_message_length: usize,
    step_timeout: Duration,
}

/// Default deadline for one stateless step.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(150);

impl IntakeAppState {
    /// Creates a new IntakeAppState with the default greeting.
    pub fn new(engine: Arc<DialogueTurnEngine>, activity: ActivityRecorder) -> Self {
        Self {
            engine,
            activity,
            greeting: Arc::from(DEFAULT_GREETING),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            step_timeout: DEFAULT_STEP_TIMEOUT,
        }
    }

    /// Sets the opening line of streaming sessions.
    pub fn with_greeting(mut self, greeting: impl AsRef<str>) -> Self {
        self.greeting = Arc::from(greeting.as_ref());
        self
    }

    /// Sets the utterance length limit for both surfaces.
    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    /// Sets the deadline after which a stateless step answers with an error.
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Handler for one stateless step.
    pub fn step_handler(&self) -> SimulateStepHandler {
        SimulateStepHandler::new(Arc::clone(&self.engine), self.activity.clone())
            .with_max_message_length(self.max_message_length)
    }

    /// A fresh streaming session.
    pub fn new_session(&self) -> IntakeSession {
        IntakeSession::new(
            Arc::clone(&self.engine),
            self.activity.clone(),
            self.greeting.as_ref(),
        )
        .with_max_message_length(self.max_message_length)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/health
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/simulate-step
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/simulate-step - Advance a client-held conversation by one turn.
///
/// Always answers with HTTP 200. Failures, including unparseable bodies and
/// turns that overrun the step deadline, come back as `status: "error"` with
/// a diagnostic in `error`.
///
/// The turn runs on its own task: a step that overruns its deadline still
/// finishes, so a lead commit is never cut off halfway.
pub async fn simulate_step(
    State(state): State<IntakeAppState>,
    payload: Result<Json<SimulateStepRequest>, JsonRejection>,
) -> Json<SimulateStepResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "rejected simulate-step body");
            return Json(SimulateStepResponse::error(format!(
                "invalid request: {}",
                rejection.body_text()
            )));
        }
    };

    let command = SimulateStepCommand {
        messages: request.messages,
        text: request.text,
    };

    let handler = state.step_handler();
    let turn = tokio::spawn(async move { handler.handle(command).await });

    let result = match tokio::time::timeout(state.step_timeout, turn).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            tracing::error!(error = %join_err, "simulate-step task aborted");
            return Json(SimulateStepResponse::error("turn aborted"));
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.step_timeout.as_secs_f64(),
                "simulate-step deadline exceeded, turn continues in background"
            );
            return Json(SimulateStepResponse::error(format!(
                "turn did not finish within the {:.1}s deadline",
                state.step_timeout.as_secs_f64()
            )));
        }
    };

    match result {
        Ok(result) => Json(result.into()),
        Err(err) => {
            match &err {
                SimulateStepError::InvalidInput(_) => {
                    tracing::debug!(error = %err, "simulate-step input rejected")
                }
                SimulateStepError::Turn(TurnError::Configuration(_)) => {
                    tracing::error!(error = %err, "simulate-step failed: engine not configured")
                }
                SimulateStepError::Turn(_) => {
                    tracing::warn!(error = %err, "simulate-step turn failed")
                }
            }
            Json(SimulateStepResponse::error(err.to_string()))
        }
    }
}
