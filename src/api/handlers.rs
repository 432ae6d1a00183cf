//! Request handlers

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderName},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::async_impl::StreamPump;
use crate::ipc::{frame_stream, ChannelSink};
use crate::metrics::MetricsReport;
use crate::sensor::TelemetryGenerator;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Predictive maintenance telemetry simulator is running".to_string(),
    })
}

/// Raw query for `/api/simulate`; parsed leniently so a bad value never
/// rejects the request.
#[derive(Debug, Deserialize)]
pub struct SimulateQuery {
    pub noise_level: Option<String>,
}

/// Opens a server-sent event stream of synthetic readings.
///
/// Each request gets its own generator and pump task. Dropping the
/// response body closes the channel, which ends the task.
pub async fn simulate(
    State(state): State<AppState>,
    Query(query): Query<SimulateQuery>,
) -> impl IntoResponse {
    let stream_cfg = &state.config.stream;
    let noise = stream_cfg.resolve_noise(query.noise_level.as_deref());

    let (sink, rx) = ChannelSink::bounded(stream_cfg.buffer_frames);
    let pump = StreamPump::new(stream_cfg.pump_config(), state.metrics.clone());
    let generator = TelemetryGenerator::new(noise);
    let stop = state.shutdown.clone();

    tokio::spawn(async move {
        pump.run(generator, sink, stop).await;
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache, no-transform"),
            (X_ACCEL_BUFFERING, "no"),
        ],
        Body::from_stream(frame_stream(rx)),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.metrics.report())
}
