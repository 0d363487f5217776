//! Lead domain - records produced by the intake agent.

mod activity;
mod appointment;
mod record;

pub use activity::{DebugLogEntry, LogKind, CALL_VOLUME_COUNTER};
pub use appointment::{
    Appointment, AppointmentStatus, DEFAULT_APPOINTMENT_MINUTES, MAX_APPOINTMENT_MINUTES,
};
pub use record::{Lead, DEFAULT_LEAD_SOURCE, SCHEDULING_INTENT};
