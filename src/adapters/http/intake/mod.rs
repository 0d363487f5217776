//! HTTP adapter for the intake endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod streaming;
pub mod ws_handler;

pub use dto::{HealthResponse, SimulateStepRequest, SimulateStepResponse};
pub use handlers::IntakeAppState;
pub use routes::{intake_router, intake_routes};
pub use streaming::{StreamClientMessage, StreamServerMessage};
