//! In-Memory Activity Log Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::lead::DebugLogEntry;
use crate::ports::ActivityLog;

/// In-memory debug log and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<Vec<DebugLogEntry>>>,
    counters: Arc<RwLock<HashMap<String, i64>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of appended entries, in order
    pub async fn entries(&self) -> Vec<DebugLogEntry> {
        self.entries.read().await.clone()
    }

    /// Current value of a counter (0 if never incremented)
    pub async fn counter(&self, name: &str) -> i64 {
        self.counters.read().await.get(name).copied().unwrap_or(0)
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::database("activity log unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn append(&self, entry: &DebugLogEntry) -> Result<(), DomainError> {
        self.check()?;
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn increment_counter(&self, name: &str) -> Result<i64, DomainError> {
        self.check()?;
        let mut counters = self.counters.write().await;
        let value = counters.entry(name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }
}
