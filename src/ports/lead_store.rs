//! Lead store port (write side).
//!
//! Defines the contract for persisting leads and their appointments.
//!
//! # Design
//!
//! - **Append-only**: records are inserted, never updated or deleted
//! - **No cross-record transaction**: a lead may persist without its
//!   appointment; callers decide how to treat that

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::lead::{Appointment, Lead};

/// Repository port for lead and appointment records.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert a new lead.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert_lead(&self, lead: &Lead) -> Result<(), DomainError>;

    /// Insert an appointment referencing an existing lead.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure (including a missing lead)
    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), DomainError>;
}
