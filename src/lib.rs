//! rtmp-bridge: control plane for relaying RTMP ingest to an RTSP server
//!
//! Each relayed stream is an `ffmpeg` child process that reads the RTMP
//! source and publishes to `rtsp://<relay>/<stream_key>`. The service starts,
//! stops and reports on those processes, and separately fans drone telemetry
//! out to WebSocket subscribers.
//!
//! # Example
//! ```no_run
//! use rtmp_bridge::{BridgeServer, ServerConfig};
//!
//! # async fn example() -> rtmp_bridge::error::Result<()> {
//! let config = ServerConfig::default().relay_host("mediamtx:8554");
//! let server = BridgeServer::new(config);
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod process;
pub mod registry;
pub mod server;
pub mod telemetry;

pub use error::{Error, Result};
pub use registry::{RegistryConfig, RegistryError, StreamKey, StreamRegistry};
pub use server::{BridgeServer, ServerConfig};
pub use telemetry::{TelemetryBroadcaster, TelemetryEvent};
