//! Axum routes for the intake endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, simulate_step, IntakeAppState};
use super::ws_handler::voice_stream_handler;

/// Creates routes for intake endpoints.
///
/// - GET  /health        - Liveness check
/// - POST /simulate-step - Stateless step
/// - GET  /voice-stream  - WebSocket session
pub fn intake_routes() -> Router<IntakeAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/simulate-step", post(simulate_step))
        .route("/voice-stream", get(voice_stream_handler))
}

/// Combined router with all intake routes under /api.
pub fn intake_router(state: IntakeAppState) -> Router {
    Router::new()
        .nest("/api", intake_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_routes_creates_valid_router() {
        let _routes = intake_routes();
    }
}
