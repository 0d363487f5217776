//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `intake` - Extraction state, transcript, tools and state recovery
//! - `lead` - Lead, appointment and activity records

pub mod foundation;
pub mod intake;
pub mod lead;
