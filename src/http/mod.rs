//! HTTP surface
//!
//! Thin axum layer over the registry and the telemetry broadcaster. Handlers
//! bind JSON, call into the core, and map failures to `{"error": ...}`
//! bodies.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::registry::StreamRegistry;
use crate::telemetry::TelemetryBroadcaster;

pub mod error;
pub mod health;
pub mod streams;
pub mod telemetry;

pub use error::{AppError, AppResult};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<StreamRegistry>,
    pub telemetry: Arc<TelemetryBroadcaster>,
}

impl AppState {
    pub fn new(registry: Arc<StreamRegistry>, telemetry: Arc<TelemetryBroadcaster>) -> Self {
        Self {
            registry,
            telemetry,
        }
    }
}

/// `{"status": ...}` body shared by health and telemetry ingest
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_LENGTH, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(12 * 60 * 60))
}

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/streams/start", post(streams::start_stream))
        .route("/streams/stop", post(streams::stop_stream))
        .route("/streams/status", get(streams::stream_status))
        .route("/ws/telemetry", get(telemetry::telemetry_ws))
        .route("/api/telemetry", post(telemetry::ingest_telemetry))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(all(test, unix))]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::process::Stdio;

    use futures::future::BoxFuture;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tokio::process::Command;
    use tower::ServiceExt;

    use crate::process::{ProcessHandle, ProcessLauncher, TranscodeJob};
    use crate::registry::RegistryConfig;

    use super::*;

    /// `true` accepts and ignores the ffmpeg arguments, then exits
    fn state_with_program(program: &str) -> AppState {
        let config = RegistryConfig::default().ffmpeg_path(program);
        AppState::new(
            Arc::new(StreamRegistry::with_config(config)),
            Arc::new(TelemetryBroadcaster::new()),
        )
    }

    fn state() -> AppState {
        state_with_program("true")
    }

    /// Stands in for a long-lived ffmpeg: ignores the job and sleeps
    struct SleepLauncher;

    impl ProcessLauncher for SleepLauncher {
        fn launch<'a>(
            &'a self,
            _job: &'a TranscodeJob,
        ) -> BoxFuture<'a, std::io::Result<ProcessHandle>> {
            Box::pin(async move {
                let mut cmd = Command::new("sleep");
                cmd.arg("30")
                    .stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
                ProcessHandle::spawn(&mut cmd)
            })
        }
    }

    fn state_with_sleeper() -> AppState {
        let registry =
            StreamRegistry::with_launcher(RegistryConfig::default(), Arc::new(SleepLauncher));
        AppState::new(Arc::new(registry), Arc::new(TelemetryBroadcaster::new()))
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        post_raw(uri, body.to_string())
    }

    fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&state(), get_req("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_start_returns_rtsp_url() {
        let state = state_with_sleeper();
        let (status, body) = send(
            &state,
            post_json(
                "/streams/start",
                json!({ "rtmp_url": "rtmp://src/a", "stream_key": "keyA" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "stream started", "rtsp_url": "rtsp://localhost:8554/keyA" })
        );

        let (_, listing) = send(&state, get_req("/streams/status")).await;
        assert_eq!(listing[0]["stream_key"], "keyA");
        assert_eq!(listing[0]["rtmp_url"], "rtmp://src/a");
        assert_eq!(listing[0]["rtsp_url"], "rtsp://localhost:8554/keyA");
        assert_eq!(listing[0]["status"], "running");

        let (status, _) = send(
            &state,
            post_json("/streams/stop", json!({ "stream_key": "keyA" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.registry.stream_count().await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_start_conflicts() {
        let state = state();
        let body = json!({ "rtmp_url": "rtmp://src/a", "stream_key": "keyA" });

        send(&state, post_json("/streams/start", body.clone())).await;
        let (status, err) = send(&state, post_json("/streams/start", body)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err, json!({ "error": "stream already running" }));
    }

    #[tokio::test]
    async fn test_start_validation() {
        let state = state();

        let (status, body) = send(
            &state,
            post_json("/streams/start", json!({ "stream_key": "keyA" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(
            &state,
            post_json("/streams/start", json!({ "rtmp_url": "", "stream_key": "keyA" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "rtmp_url is required" }));

        let (status, _) = send(&state, post_raw("/streams/start", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(state.registry.stream_count().await, 0);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_500() {
        let state = state_with_program("/nonexistent/ffmpeg");
        let (status, body) = send(
            &state,
            post_json(
                "/streams/start",
                json!({ "rtmp_url": "rtmp://src/a", "stream_key": "keyA" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
        assert_eq!(state.registry.stream_count().await, 0);
    }

    #[tokio::test]
    async fn test_stop_lifecycle() {
        let state = state();

        let (status, body) = send(
            &state,
            post_json("/streams/stop", json!({ "stream_key": "missing" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "stream not found" }));

        send(
            &state,
            post_json(
                "/streams/start",
                json!({ "rtmp_url": "rtmp://src/a", "stream_key": "keyA" }),
            ),
        )
        .await;
        let (status, body) = send(
            &state,
            post_json("/streams/stop", json!({ "stream_key": "keyA" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "stream stopped" }));

        let (_, listing) = send(&state, get_req("/streams/status")).await;
        assert_eq!(listing, json!([]));
    }

    #[tokio::test]
    async fn test_stop_requires_key() {
        let (status, _) = send(&state(), post_json("/streams/stop", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_telemetry_without_subscribers() {
        let (status, body) = send(
            &state(),
            post_json(
                "/api/telemetry",
                json!({ "lat": 55.7, "lng": 37.6, "alt": 150.0, "speed": 10.0, "timestamp": 1700000000000i64 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "telemetry sent" }));
    }

    #[tokio::test]
    async fn test_telemetry_reaches_subscriber() {
        let state = state();
        let (_, mut rx) = state.telemetry.register().await;

        let event = json!({ "lat": 1.5, "lng": 2.5, "alt": 3.5, "speed": 4.5, "timestamp": 42 });
        let (status, _) = send(&state, post_json("/api/telemetry", event.clone())).await;
        assert_eq!(status, StatusCode::OK);

        let frame = rx.recv().await.unwrap();
        let received: Value = serde_json::from_str(frame.as_str()).unwrap();
        assert_eq!(received, event);
    }

    #[tokio::test]
    async fn test_telemetry_invalid_body() {
        let (status, body) = send(
            &state(),
            post_json("/api/telemetry", json!({ "lat": "north", "lng": 1.0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_ws_without_upgrade_headers_is_rejected() {
        let response = create_router(state())
            .oneshot(get_req("/ws/telemetry"))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/streams/start")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = create_router(state()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
