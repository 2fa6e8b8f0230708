//! Telemetry broadcaster configuration

/// Default number of frames queued per subscriber
pub const DEFAULT_SUBSCRIBER_QUEUE_CAPACITY: usize = 256;

/// Configuration for the telemetry broadcaster
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Frames buffered per subscriber before publishing waits for it
    pub subscriber_queue_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            subscriber_queue_capacity: DEFAULT_SUBSCRIBER_QUEUE_CAPACITY,
        }
    }
}

impl TelemetryConfig {
    /// Set the per-subscriber queue capacity (minimum 1)
    pub fn subscriber_queue_capacity(mut self, capacity: usize) -> Self {
        self.subscriber_queue_capacity = capacity.max(1);
        self
    }
}
