//! PostgreSQL implementation of ActivityLog.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::lead::DebugLogEntry;
use crate::ports::ActivityLog;

/// PostgreSQL implementation of ActivityLog.
#[derive(Clone)]
pub struct PostgresActivityLog {
    pool: PgPool,
}

impl PostgresActivityLog {
    /// Creates a new PostgresActivityLog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLog for PostgresActivityLog {
    async fn append(&self, entry: &DebugLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO debug_logs (session_id, kind, content, metadata, created_at)
            VALUES ($1, $2, $3, $4::jsonb, $5)
            "#,
        )
        .bind(entry.session_id.as_uuid())
        .bind(entry.kind.as_str())
        .bind(&entry.content)
        .bind(entry.metadata.to_string())
        .bind(entry.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to insert debug log: {}", e)))?;

        Ok(())
    }

    async fn increment_counter(&self, name: &str) -> Result<i64, DomainError> {
        let (value,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO counters (name, value) VALUES ($1, 1)
            ON CONFLICT (name) DO UPDATE SET value = counters.value + 1
            RETURNING value
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to increment counter: {}", e)))?;

        Ok(value)
    }
}
