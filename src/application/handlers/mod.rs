//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

pub mod intake;

pub use intake::{
    ActivityRecorder, DialogueTurnEngine, IntakeSession, LeadCommitter, SessionEvent,
    SimulateStepCommand, SimulateStepError, SimulateStepHandler, SimulateStepResult, StepStatus,
    TurnError, TurnOutcome,
};
