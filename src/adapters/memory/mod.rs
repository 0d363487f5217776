//! In-memory adapters for the storage ports.
//!
//! Used when no database URL is configured and throughout the test suite.

mod in_memory_activity_log;
mod in_memory_lead_store;

pub use in_memory_activity_log::InMemoryActivityLog;
pub use in_memory_lead_store::InMemoryLeadStore;
