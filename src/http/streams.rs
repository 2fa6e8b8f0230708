//! Stream control endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::{AppError, AppResult, AppState};
use crate::registry::{StreamKey, StreamStatus};

#[derive(Debug, Deserialize)]
pub struct StartStreamRequest {
    pub rtmp_url: String,
    pub stream_key: String,
}

#[derive(Debug, Serialize)]
pub struct StartStreamResponse {
    pub message: &'static str,
    pub rtsp_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StopStreamRequest {
    pub stream_key: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(())
}

/// POST /streams/start
pub async fn start_stream(
    State(state): State<AppState>,
    payload: Result<Json<StartStreamRequest>, JsonRejection>,
) -> AppResult<Json<StartStreamResponse>> {
    let Json(req) = payload.inspect_err(|e| {
        tracing::warn!(error = %e, "Invalid start request");
    })?;
    require("rtmp_url", &req.rtmp_url)?;
    require("stream_key", &req.stream_key)?;

    let key = StreamKey::new(req.stream_key);
    let rtsp_url = state.registry.start(&key, &req.rtmp_url).await?;

    Ok(Json(StartStreamResponse {
        message: "stream started",
        rtsp_url,
    }))
}

/// POST /streams/stop
pub async fn stop_stream(
    State(state): State<AppState>,
    payload: Result<Json<StopStreamRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(req) = payload.inspect_err(|e| {
        tracing::warn!(error = %e, "Invalid stop request");
    })?;
    require("stream_key", &req.stream_key)?;

    state.registry.stop(&StreamKey::new(req.stream_key)).await?;

    Ok(Json(MessageResponse {
        message: "stream stopped",
    }))
}

/// GET /streams/status
pub async fn stream_status(State(state): State<AppState>) -> Json<Vec<StreamStatus>> {
    Json(state.registry.status().await)
}
