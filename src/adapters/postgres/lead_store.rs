//! PostgreSQL implementation of LeadStore.
//!
//! Leads and appointments are inserted in separate statements; an
//! appointment failure leaves the lead row in place.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::lead::{Appointment, Lead};
use crate::ports::LeadStore;

/// PostgreSQL implementation of LeadStore.
#[derive(Clone)]
pub struct PostgresLeadStore {
    pool: PgPool,
}

impl PostgresLeadStore {
    /// Creates a new PostgresLeadStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PostgresLeadStore {
    async fn insert_lead(&self, lead: &Lead) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO leads (
                id, name, address, service, intent, source, summary_of_call, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(lead.id.as_uuid())
        .bind(&lead.name)
        .bind(&lead.address)
        .bind(&lead.service)
        .bind(&lead.intent)
        .bind(&lead.source)
        .bind(lead.summary.as_deref())
        .bind(lead.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert lead: {}", e)))?;

        Ok(())
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, lead_id, status, start_time, end_time, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(appointment.id.as_uuid())
        .bind(appointment.lead_id.as_uuid())
        .bind(appointment.status.as_str())
        .bind(appointment.start_time.as_datetime())
        .bind(appointment.end_time.as_datetime())
        .bind(appointment.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DomainError::not_found(
                format!("Failed to insert appointment: lead {} does not exist", appointment.lead_id),
            ),
            _ => DomainError::database(format!("Failed to insert appointment: {}", e)),
        })?;

        Ok(())
    }
}
