//! HTTP DTOs for the intake endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::intake::{SimulateStepResult, StepStatus};
use crate::domain::foundation::LeadId;
use crate::domain::intake::prompts::ERROR_REPLY;
use crate::domain::intake::{ExtractionUpdate, Message};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/simulate-step`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateStepRequest {
    /// Client-held transcript.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// New user utterance.
    #[serde(default)]
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response of `POST /api/simulate-step`. Always returned with HTTP 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateStepResponse {
    pub text: String,
    /// Fields reported during this turn only.
    pub extracted: ExtractionUpdate,
    pub status: StepStatus,
    /// Diagnostic text, present only when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Transcript entries this turn appended, for clients that keep history.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<LeadId>,
}

impl SimulateStepResponse {
    /// Error-shaped response carrying a diagnostic.
    pub fn error(diagnostic: impl Into<String>) -> Self {
        Self {
            text: ERROR_REPLY.to_string(),
            extracted: ExtractionUpdate::default(),
            status: StepStatus::Error,
            error: Some(diagnostic.into()),
            messages: Vec::new(),
            lead_id: None,
        }
    }
}

impl From<SimulateStepResult> for SimulateStepResponse {
    fn from(result: SimulateStepResult) -> Self {
        Self {
            text: result.text,
            extracted: result.extracted,
            status: result.status,
            error: None,
            messages: result.appended,
            lead_id: result.lead_id,
        }
    }
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Backend is healthy".to_string(),
        }
    }
}
