//! HTTP server listener
//!
//! Binds the TCP listener, serves the router, and stops every transcoder on
//! shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::error::Result;
use crate::http::{create_router, AppState};
use crate::registry::StreamRegistry;
use crate::server::config::ServerConfig;
use crate::telemetry::TelemetryBroadcaster;

/// RTMP to RTSP bridge server
pub struct BridgeServer {
    config: ServerConfig,
    registry: Arc<StreamRegistry>,
    telemetry: Arc<TelemetryBroadcaster>,
}

impl BridgeServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(StreamRegistry::with_config(config.registry.clone()));
        Self::with_registry(config, registry)
    }

    /// Create a new server around an existing registry
    pub fn with_registry(config: ServerConfig, registry: Arc<StreamRegistry>) -> Self {
        let telemetry = Arc::new(TelemetryBroadcaster::with_config(config.telemetry.clone()));

        Self {
            config,
            registry,
            telemetry,
        }
    }

    /// Get a reference to the stream registry
    pub fn registry(&self) -> &Arc<StreamRegistry> {
        &self.registry
    }

    /// Get a reference to the telemetry broadcaster
    pub fn telemetry(&self) -> &Arc<TelemetryBroadcaster> {
        &self.telemetry
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            addr = %addr,
            relay = %self.config.registry.relay_host,
            "Starting RTMP->RTSP converter API"
        );

        let state = AppState::new(Arc::clone(&self.registry), Arc::clone(&self.telemetry));
        let router = create_router(state);

        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        // Transcoders must not outlive the service
        self.registry.stop_all().await;

        result?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn test_serves_health_and_shuts_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Arc::new(BridgeServer::new(ServerConfig::with_addr(addr)));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = {
            let server = Arc::clone(&server);
            tokio::spawn(async move {
                server
                    .serve(listener, async move {
                        let _ = shutdown_rx.await;
                    })
                    .await
            })
        };

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#"{"status":"ok"}"#));

        shutdown_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
        assert_eq!(server.registry().stream_count().await, 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = BridgeServer::new(ServerConfig::with_addr(addr));

        let result = server.run_until(async {}).await;
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
