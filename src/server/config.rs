//! Server configuration

use std::net::SocketAddr;

use crate::registry::RegistryConfig;
use crate::telemetry::TelemetryConfig;

/// Default HTTP listen address
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Stream registry settings
    pub registry: RegistryConfig,

    /// Telemetry broadcaster settings
    pub telemetry: TelemetryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            registry: RegistryConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the RTSP relay host
    pub fn relay_host(mut self, host: impl Into<String>) -> Self {
        self.registry = self.registry.relay_host(host);
        self
    }

    /// Set the ffmpeg executable
    pub fn ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.registry = self.registry.ffmpeg_path(path);
        self
    }

    /// Set the per-subscriber telemetry queue capacity
    pub fn subscriber_queue_capacity(mut self, capacity: usize) -> Self {
        self.telemetry = self.telemetry.subscriber_queue_capacity(capacity);
        self
    }
}
