//! HTTP API - health, telemetry stream, and metrics endpoints

pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
