//! Subscriber connection loop
//!
//! Runs one telemetry subscription over an already upgraded WebSocket. The
//! socket halves are taken as a generic `Sink`/`Stream` pair so the loop can
//! be driven by in-memory channels in tests.

use std::fmt::Display;

use axum::extract::ws::Message;
use futures::{Sink, SinkExt, Stream, StreamExt};

use super::broadcaster::{SubscriberId, TelemetryBroadcaster};

/// Serve one subscriber until its connection goes away
///
/// Registers the connection, spawns a writer task draining its queue into
/// `sink`, then blocks reading `stream` purely to detect disconnects. When
/// the read side ends the subscriber is unregistered and the sink closed.
pub async fn run_subscription<W, R, E>(broadcaster: &TelemetryBroadcaster, sink: W, stream: R)
where
    W: Sink<Message> + Send + Unpin + 'static,
    W::Error: Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let (id, mut rx) = broadcaster.register().await;

    let writer = tokio::spawn(async move {
        let mut sink = sink;
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sink.send(Message::Text(frame)).await {
                tracing::debug!(subscriber = %id, error = %e, "Telemetry write failed");
                break;
            }
        }
        if let Err(e) = sink.close().await {
            tracing::debug!(subscriber = %id, error = %e, "Telemetry close failed");
        }
    });

    wait_for_disconnect(id, stream).await;

    // Dropping the queue sender ends the writer once it drains
    broadcaster.unregister(id).await;

    if let Err(e) = writer.await {
        tracing::warn!(subscriber = %id, error = %e, "Telemetry writer task failed");
    }

    tracing::debug!(subscriber = %id, "Subscriber connection closed");
}

/// Read until close, error or end of stream; inbound data is discarded
async fn wait_for_disconnect<R, E>(id: SubscriberId, mut stream: R)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(subscriber = %id, error = %e, "Subscriber read failed");
                break;
            }
        }
    }
}
