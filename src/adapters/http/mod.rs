//! HTTP adapters - REST and WebSocket surfaces.
//!
//! - `intake` - stateless step endpoint, voice stream, health check
//! - `middleware` - tracing, CORS, timeouts, request ids

pub mod intake;
pub mod middleware;

pub use intake::{intake_router, IntakeAppState};
pub use middleware::apply_middleware;
