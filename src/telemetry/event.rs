//! Telemetry event type

use axum::extract::ws::Utf8Bytes;
use serde::{Deserialize, Serialize};

/// A single positional sample from a drone
///
/// All fields are required when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Altitude in meters
    pub alt: f64,
    /// Ground speed
    pub speed: f64,
    /// Sample time, epoch milliseconds
    pub timestamp: i64,
}

impl TelemetryEvent {
    /// Encode to the JSON text frame sent to subscribers
    ///
    /// `Utf8Bytes` is reference counted, so the frame is encoded once and
    /// shared by every subscriber queue.
    pub fn encode(&self) -> Result<Utf8Bytes, serde_json::Error> {
        serde_json::to_string(self).map(Utf8Bytes::from)
    }
}
