//! Activity log port - debug logs and counters.
//!
//! Everything written through this port is best-effort: callers log and
//! drop failures, they never alter a turn's outcome.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::lead::DebugLogEntry;

/// Port for the operational side channel.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Append a debug log entry.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn append(&self, entry: &DebugLogEntry) -> Result<(), DomainError>;

    /// Atomically increment a named counter, creating it at 1 if absent.
    ///
    /// Returns the counter value after the increment.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn increment_counter(&self, name: &str) -> Result<i64, DomainError>;
}
