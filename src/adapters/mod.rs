//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - completion engines (OpenAI, mock, unconfigured)
//! - `http` - Axum routes for the intake surfaces
//! - `memory` - in-process stores for development and tests
//! - `postgres` - PostgreSQL lead store and activity log

pub mod ai;
pub mod http;
pub mod memory;
pub mod postgres;
