//! Telemetry fan-out
//!
//! Each subscriber owns a bounded queue drained by its connection's writer
//! task. Publishing snapshots the registered queues under the lock and then
//! enqueues outside it, so registration and removal never wait on delivery.
//! A full queue makes the publisher wait for room; frames are never dropped
//! for a live subscriber.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use super::config::TelemetryConfig;
use super::event::TelemetryEvent;

/// Identifier of a registered subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry of live telemetry subscribers
pub struct TelemetryBroadcaster {
    /// Outbound queue per live connection
    connections: Mutex<HashMap<SubscriberId, mpsc::Sender<Utf8Bytes>>>,

    next_id: AtomicU64,

    config: TelemetryConfig,
}

impl TelemetryBroadcaster {
    /// Create a broadcaster with default configuration
    pub fn new() -> Self {
        Self::with_config(TelemetryConfig::default())
    }

    /// Create a broadcaster with custom configuration
    pub fn with_config(config: TelemetryConfig) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    /// Get the broadcaster configuration
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Register a new subscriber
    ///
    /// Returns its id and the receiving end of its queue. The subscriber stays
    /// registered until [`TelemetryBroadcaster::unregister`] is called, even
    /// if the receiver is dropped.
    pub async fn register(&self) -> (SubscriberId, mpsc::Receiver<Utf8Bytes>) {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.config.subscriber_queue_capacity);

        let mut connections = self.connections.lock().await;
        connections.insert(id, tx);

        tracing::info!(subscriber = %id, subscribers = connections.len(), "Subscriber added");

        (id, rx)
    }

    /// Remove a subscriber; returns whether it was registered
    pub async fn unregister(&self, id: SubscriberId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(&id).is_some();

        if removed {
            tracing::info!(subscriber = %id, subscribers = connections.len(), "Subscriber removed");
        }

        removed
    }

    /// Number of registered subscribers
    pub async fn subscriber_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Encode an event and fan it out to every subscriber
    ///
    /// Returns the number of subscribers that accepted the frame.
    pub async fn publish(&self, event: &TelemetryEvent) -> usize {
        match event.encode() {
            Ok(frame) => self.publish_frame(frame).await,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode telemetry");
                0
            }
        }
    }

    /// Fan out an already encoded frame
    ///
    /// Waits for queue space on each subscriber in turn. A subscriber whose
    /// writer has gone away is logged and skipped; it is not removed here,
    /// that is left to its own connection loop.
    pub async fn publish_frame(&self, frame: Utf8Bytes) -> usize {
        let targets: Vec<(SubscriberId, mpsc::Sender<Utf8Bytes>)> = {
            let connections = self.connections.lock().await;
            connections
                .iter()
                .map(|(id, tx)| (*id, tx.clone()))
                .collect()
        };

        let mut delivered = 0;
        for (id, tx) in targets {
            if tx.send(frame.clone()).await.is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(subscriber = %id, "Subscriber connection closed, frame dropped");
            }
        }

        tracing::trace!(delivered = delivered, "Telemetry published");
        delivered
    }
}

impl Default for TelemetryBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
