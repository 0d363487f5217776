//! Lead committer - persists a lead and its appointment when scheduling fires.
//!
//! Storage failures never reach the caller: the user-facing reply of a turn
//! that scheduled is the same whether or not the records landed. Failures
//! are logged with distinct messages so they stay visible to operators.

use std::sync::Arc;

use crate::domain::foundation::{LeadId, Timestamp};
use crate::domain::intake::ExtractionState;
use crate::domain::lead::{Appointment, Lead, DEFAULT_APPOINTMENT_MINUTES, DEFAULT_LEAD_SOURCE};
use crate::ports::LeadStore;

/// Writes lead and appointment records.
#[derive(Clone)]
pub struct LeadCommitter {
    store: Arc<dyn LeadStore>,
    source: String,
    appointment_minutes: i64,
}

impl LeadCommitter {
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        Self {
            store,
            source: DEFAULT_LEAD_SOURCE.to_string(),
            appointment_minutes: DEFAULT_APPOINTMENT_MINUTES,
        }
    }

    /// Sets the origin marker written on every lead.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the length of the placeholder appointment window.
    pub fn with_appointment_minutes(mut self, minutes: i64) -> Self {
        self.appointment_minutes = minutes;
        self
    }

    /// Commits a lead built from `state`, then a linked appointment.
    ///
    /// Returns `None` only if the lead itself could not be written. An
    /// appointment failure leaves the lead in place and still returns its id.
    pub async fn commit(&self, state: &ExtractionState, summary: Option<&str>) -> Option<LeadId> {
        let lead = Lead::from_extraction(state, self.source.as_str(), summary);

        if let Err(err) = self.store.insert_lead(&lead).await {
            tracing::error!(error = %err, "lead commit failed");
            return None;
        }

        let appointment = Appointment::placeholder(lead.id, Timestamp::now(), self.appointment_minutes);
        match self.store.insert_appointment(&appointment).await {
            Ok(()) => {
                tracing::info!(
                    lead_id = %lead.id,
                    appointment_id = %appointment.id,
                    "lead committed"
                );
            }
            Err(err) => {
                tracing::warn!(
                    lead_id = %lead.id,
                    error = %err,
                    "lead committed without appointment"
                );
            }
        }

        Some(lead.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLeadStore;
    use crate::domain::intake::UNKNOWN_FIELD;
    use crate::domain::lead::AppointmentStatus;

    #[tokio::test]
    async fn empty_state_commits_sentinel_lead() {
        let store = InMemoryLeadStore::new();
        let committer = LeadCommitter::new(Arc::new(store.clone()));

        let lead_id = committer.commit(&ExtractionState::empty(), None).await;

        assert!(lead_id.is_some());
        let lead = &store.leads().await[0];
        assert_eq!(lead.name, UNKNOWN_FIELD);
        assert_eq!(lead.address, UNKNOWN_FIELD);
        assert_eq!(lead.service, UNKNOWN_FIELD);
    }

    #[tokio::test]
    async fn writes_scheduled_appointment_for_lead() {
        let store = InMemoryLeadStore::new();
        let committer = LeadCommitter::new(Arc::new(store.clone()))
            .with_source("voice_line")
            .with_appointment_minutes(30);

        let lead_id = committer
            .commit(&ExtractionState::empty(), Some("Gutter cleaning"))
            .await
            .unwrap();

        let lead = &store.leads().await[0];
        assert_eq!(lead.source, "voice_line");
        assert_eq!(lead.summary.as_deref(), Some("Gutter cleaning"));

        let appointment = &store.appointments().await[0];
        assert_eq!(appointment.lead_id, lead_id);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(
            (*appointment.end_time.as_datetime() - *appointment.start_time.as_datetime())
                .num_minutes(),
            30
        );
    }

    #[tokio::test]
    async fn lead_failure_returns_none() {
        let store = InMemoryLeadStore::new();
        store.fail_lead_inserts(true);
        let committer = LeadCommitter::new(Arc::new(store.clone()));

        assert!(committer.commit(&ExtractionState::empty(), None).await.is_none());
        assert!(store.appointments().await.is_empty());
    }

    #[tokio::test]
    async fn appointment_failure_keeps_lead() {
        let store = InMemoryLeadStore::new();
        store.fail_appointment_inserts(true);
        let committer = LeadCommitter::new(Arc::new(store.clone()));

        let lead_id = committer.commit(&ExtractionState::empty(), None).await;

        assert!(lead_id.is_some());
        assert_eq!(store.lead_count().await, 1);
        assert!(store.appointments().await.is_empty());
    }
}
