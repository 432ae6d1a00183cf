//! HTTP surface: SSE endpoint, CORS, and the prediction client

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use telemetry_simulator::api::{create_router, AppState};
use telemetry_simulator::config::{PredictionConfig, ServiceConfig};
use telemetry_simulator::error::PredictionError;
use telemetry_simulator::ipc::decode_event;
use telemetry_simulator::prediction::{PredictionClient, SequenceRequest, SequenceWindow};
use telemetry_simulator::TelemetryGenerator;

fn fast_state(max_ticks: u64, interval_ms: u64) -> AppState {
    let mut config = ServiceConfig::default();
    config.stream.max_ticks = max_ticks;
    config.stream.interval_ms = interval_ms;
    AppState::new(config)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("origin", "http://dashboard.local")
        .body(Body::empty())
        .unwrap()
}

async fn wait_for<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

// ============================================================================
// STREAM ENDPOINT
// ============================================================================

#[tokio::test]
async fn simulate_streams_bounded_event_sequence() {
    let app = create_router(fast_state(3, 1));
    let resp = app.oneshot(get("/api/simulate?noise_level=0")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["content-type"], "text/event-stream");
    assert_eq!(headers["cache-control"], "no-cache, no-transform");
    assert_eq!(headers["x-accel-buffering"], "no");
    assert_eq!(headers["access-control-allow-origin"], "*");

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    let frames: Vec<&str> = text.split_inclusive("\n\n").collect();
    assert_eq!(frames.len(), 3);

    let first = decode_event(frames[0]).unwrap();
    assert_eq!(first.get("coolant_temp_c"), Some(90.79));
}

#[tokio::test]
async fn unparsable_noise_level_still_streams() {
    let app = create_router(fast_state(1, 1));
    let resp = app
        .oneshot(get("/api/simulate?noise_level=loud"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(decode_event(&text).is_some());
}

#[tokio::test]
async fn client_disconnect_ends_stream_task() {
    let state = fast_state(10_000, 5);
    let app = create_router(state.clone());
    let resp = app.oneshot(get("/api/simulate")).await.unwrap();

    let mut chunks = resp.into_body().into_data_stream();
    let first = chunks.next().await.unwrap().unwrap();
    assert!(first.starts_with(b"data: "));
    drop(chunks);

    let metrics = state.metrics.clone();
    assert!(wait_for(|| metrics.report().consumer_errors == 1).await);
    assert!(metrics.report().readings_emitted < 10_000);
}

#[tokio::test]
async fn shutdown_cancels_open_streams() {
    let state = fast_state(10_000, 5);
    let app = create_router(state.clone());
    let resp = app.oneshot(get("/api/simulate")).await.unwrap();
    let mut chunks = resp.into_body().into_data_stream();
    assert!(chunks.next().await.is_some());

    state.shutdown.trigger();

    let drained = tokio::time::timeout(Duration::from_secs(1), async {
        while chunks.next().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok(), "body should end after shutdown");

    let metrics = state.metrics.clone();
    assert!(wait_for(|| metrics.report().streams_cancelled == 1).await);
}

// ============================================================================
// PREDICTION CLIENT
// ============================================================================

#[derive(Default)]
struct Seen {
    auth: Option<String>,
    samples: usize,
}

async fn spawn_model(status: StatusCode, verdict: serde_json::Value) -> (String, Arc<Mutex<Seen>>) {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let recorder = seen.clone();

    let app = Router::new().route(
        "/api/predict/sequence",
        post(move |headers: HeaderMap, Json(body): Json<SequenceRequest>| {
            let recorder = recorder.clone();
            let verdict = verdict.clone();
            async move {
                let mut seen = recorder.lock();
                seen.auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.samples = body.sequence.len();
                (status, Json(verdict))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), seen)
}

fn full_window() -> SequenceRequest {
    let mut gen = TelemetryGenerator::seeded(0.5, 21);
    let mut window = SequenceWindow::new(10);
    let batch = gen
        .by_ref()
        .find_map(|reading| window.push(reading))
        .unwrap();
    SequenceRequest::from_readings(&batch).unwrap()
}

fn client(base_url: String) -> PredictionClient {
    PredictionClient::new(&PredictionConfig {
        base_url,
        ..PredictionConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn prediction_client_posts_window_and_decodes_verdict() {
    let (base_url, seen) = spawn_model(
        StatusCode::OK,
        serde_json::json!({"anomaly": true, "failure_probability": 0.87, "prediction": 1}),
    )
    .await;

    let verdict = client(base_url)
        .with_token("secret")
        .predict_sequence(&full_window())
        .await
        .unwrap();

    assert!(verdict.anomaly);
    assert_eq!(verdict.failure_probability, 0.87);
    assert_eq!(verdict.prediction, Some(1));

    let seen = seen.lock();
    assert_eq!(seen.samples, 10);
    assert_eq!(seen.auth.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn prediction_client_rejects_out_of_range_probability() {
    let (base_url, _) = spawn_model(
        StatusCode::OK,
        serde_json::json!({"anomaly": false, "failure_probability": 1.5}),
    )
    .await;

    let err = client(base_url)
        .predict_sequence(&full_window())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictionError::InvalidProbability(p) if p == 1.5));
}

#[tokio::test]
async fn prediction_client_surfaces_server_errors() {
    let (base_url, _) = spawn_model(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({"detail": "model not loaded"}),
    )
    .await;

    let err = client(base_url)
        .predict_sequence(&full_window())
        .await
        .unwrap_err();
    assert!(matches!(err, PredictionError::Status { status: 500, .. }));
}
