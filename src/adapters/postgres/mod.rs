//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresLeadStore` - lead and appointment inserts
//! - `PostgresActivityLog` - debug logs and counters

mod activity_log;
mod lead_store;

pub use activity_log::PostgresActivityLog;
pub use lead_store::PostgresLeadStore;
