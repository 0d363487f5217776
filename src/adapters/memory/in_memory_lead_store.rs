//! In-Memory Lead Store Adapter
//!
//! Keeps leads and appointments in memory. Used when no database is
//! configured, and by tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::lead::{Appointment, Lead};
use crate::ports::LeadStore;

/// In-memory storage for committed leads.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLeadStore {
    leads: Arc<RwLock<Vec<Lead>>>,
    appointments: Arc<RwLock<Vec<Appointment>>>,
    fail_leads: Arc<AtomicBool>,
    fail_appointments: Arc<AtomicBool>,
}

impl InMemoryLeadStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent lead insert fail.
    pub fn fail_lead_inserts(&self, fail: bool) {
        self.fail_leads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent appointment insert fail.
    pub fn fail_appointment_inserts(&self, fail: bool) {
        self.fail_appointments.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of stored leads, in insertion order
    pub async fn leads(&self) -> Vec<Lead> {
        self.leads.read().await.clone()
    }

    /// Snapshot of stored appointments, in insertion order
    pub async fn appointments(&self) -> Vec<Appointment> {
        self.appointments.read().await.clone()
    }

    /// Get the number of stored leads
    pub async fn lead_count(&self) -> usize {
        self.leads.read().await.len()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert_lead(&self, lead: &Lead) -> Result<(), DomainError> {
        if self.fail_leads.load(Ordering::SeqCst) {
            return Err(DomainError::database("Failed to insert lead: store unavailable"));
        }
        self.leads.write().await.push(lead.clone());
        Ok(())
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), DomainError> {
        if self.fail_appointments.load(Ordering::SeqCst) {
            return Err(DomainError::database(
                "Failed to insert appointment: store unavailable",
            ));
        }

        let lead_exists = self
            .leads
            .read()
            .await
            .iter()
            .any(|lead| lead.id == appointment.lead_id);
        if !lead_exists {
            return Err(DomainError::not_found(format!(
                "Failed to insert appointment: lead {} does not exist",
                appointment.lead_id
            )));
        }

        self.appointments.write().await.push(appointment.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, LeadId, Timestamp};
    use crate::domain::intake::ExtractionState;
    use crate::domain::lead::DEFAULT_LEAD_SOURCE;

    fn sample_lead() -> Lead {
        Lead::from_extraction(&ExtractionState::empty(), DEFAULT_LEAD_SOURCE, None)
    }

    #[tokio::test]
    async fn stores_lead_and_appointment() {
        let store = InMemoryLeadStore::new();
        let lead = sample_lead();
        store.insert_lead(&lead).await.unwrap();
        store
            .insert_appointment(&Appointment::placeholder(lead.id, Timestamp::now(), 60))
            .await
            .unwrap();

        assert_eq!(store.lead_count().await, 1);
        assert_eq!(store.appointments().await[0].lead_id, lead.id);
    }

    #[tokio::test]
    async fn rejects_appointment_for_unknown_lead() {
        let store = InMemoryLeadStore::new();
        let result = store
            .insert_appointment(&Appointment::placeholder(LeadId::new(), Timestamp::now(), 60))
            .await;

        assert_eq!(result.unwrap_err().code(), ErrorCode::NotFound);
        assert!(store.appointments().await.is_empty());
    }

    #[tokio::test]
    async fn failure_injection_applies_per_table() {
        let store = InMemoryLeadStore::new();
        store.fail_appointment_inserts(true);

        let lead = sample_lead();
        store.insert_lead(&lead).await.unwrap();
        assert!(store
            .insert_appointment(&Appointment::placeholder(lead.id, Timestamp::now(), 60))
            .await
            .is_err());

        store.fail_lead_inserts(true);
        assert!(store.insert_lead(&sample_lead()).await.is_err());
        assert_eq!(store.lead_count().await, 1);
    }
}
