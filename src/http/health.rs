//! Health check endpoint

use axum::Json;

use crate::http::StatusResponse;

/// Basic health check (always returns OK if server is running)
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}
