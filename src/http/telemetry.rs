//! Telemetry endpoints
//!
//! `POST /api/telemetry` accepts one event and fans it out; `GET /ws/telemetry`
//! upgrades to a WebSocket that receives every published event.

use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;

use crate::http::{AppResult, AppState, StatusResponse};
use crate::telemetry::{run_subscription, TelemetryEvent};

/// GET /ws/telemetry
pub async fn telemetry_ws(
    State(state): State<AppState>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    match ws {
        Ok(ws) => ws
            .on_failed_upgrade(|e| {
                tracing::error!(error = %e, "WebSocket upgrade failed");
            })
            .on_upgrade(move |socket| handle_socket(socket, state))
            .into_response(),
        Err(rejection) => {
            tracing::error!(error = %rejection, "WebSocket upgrade failed");
            rejection.into_response()
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sink, stream) = socket.split();
    run_subscription(&state.telemetry, sink, stream).await;
}

/// POST /api/telemetry
pub async fn ingest_telemetry(
    State(state): State<AppState>,
    payload: Result<Json<TelemetryEvent>, JsonRejection>,
) -> AppResult<Json<StatusResponse>> {
    let Json(event) = payload.inspect_err(|e| {
        tracing::warn!(error = %e, "Invalid telemetry");
    })?;

    let delivered = state.telemetry.publish(&event).await;
    tracing::debug!(delivered = delivered, timestamp = event.timestamp, "Telemetry received");

    Ok(Json(StatusResponse {
        status: "telemetry sent",
    }))
}
