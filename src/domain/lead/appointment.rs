//! Appointment - follow-up booked against a committed lead.
//!
//! No calendar negotiation happens here: the start time is a placeholder
//! (commit time) and the window has a fixed length.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AppointmentId, LeadId, Timestamp};

/// Default appointment length in minutes.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 60;

/// Longest placeholder window, seven days.
pub const MAX_APPOINTMENT_MINUTES: i64 = 7 * 24 * 60;

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
}

impl AppointmentStatus {
    /// Returns the stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appointment linked to a lead. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub lead_id: LeadId,
    pub status: AppointmentStatus,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
}

impl Appointment {
    /// Creates a scheduled placeholder appointment starting at `start`.
    ///
    /// The window is clamped to between one minute and `MAX_APPOINTMENT_MINUTES`.
    pub fn placeholder(lead_id: LeadId, start: Timestamp, duration_minutes: i64) -> Self {
        Self {
            id: AppointmentId::new(),
            lead_id,
            status: AppointmentStatus::Scheduled,
            start_time: start,
            end_time: start.plus_minutes(duration_minutes.clamp(1, MAX_APPOINTMENT_MINUTES)),
            created_at: Timestamp::now(),
        }
    }
}
