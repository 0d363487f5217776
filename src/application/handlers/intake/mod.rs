//! Intake handlers.
//!
//! The turn engine and committer are shared by both delivery modes:
//! `SimulateStepHandler` (stateless, history supplied per call) and
//! `IntakeSession` (stateful, one per streaming connection).

mod activity;
mod lead_committer;
mod session;
mod simulate_step;
mod turn_engine;

pub use activity::ActivityRecorder;
pub use lead_committer::LeadCommitter;
pub use session::{IntakeSession, SessionEvent};
pub use simulate_step::{
    SimulateStepCommand, SimulateStepError, SimulateStepHandler, SimulateStepResult, StepStatus,
    DEFAULT_MAX_MESSAGE_LENGTH,
};
pub use turn_engine::{
    validate_utterance, DialogueTurnEngine, TurnError, TurnInput, TurnOutcome, TurnStage,
    UtteranceError,
};
