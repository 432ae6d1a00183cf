//! Application state for API handlers

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::ipc::StopSignal;
use crate::metrics::StreamMetrics;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,

    /// Latency and lifecycle counters across all streams
    pub metrics: StreamMetrics,

    /// Triggered on server shutdown; every open stream watches it
    pub shutdown: StopSignal,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: Arc::new(config),
            metrics: StreamMetrics::new(),
            shutdown: StopSignal::new(),
        }
    }
}
