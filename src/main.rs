//! rtmp-bridge server binary
//!
//! Run with: rtmp-bridge [--bind ADDR] [--relay-host HOST:PORT] [--ffmpeg PATH]
//!
//! Start a relay:
//!   curl -X POST localhost:8080/streams/start \
//!     -d '{"rtmp_url": "rtmp://localhost/live/cam", "stream_key": "cam"}'
//!
//! Watch telemetry:
//!   websocat ws://localhost:8080/ws/telemetry

use std::net::SocketAddr;

use clap::Parser;

use rtmp_bridge::logging::{init_logging, LogFormat, LoggingConfig};
use rtmp_bridge::{BridgeServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "rtmp-bridge")]
#[command(about = "RTMP to RTSP relay control plane", long_about = None)]
struct Args {
    /// HTTP listen address
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// RTSP relay server (host:port)
    #[arg(long, env = "RELAY_HOST", default_value = "localhost:8554")]
    relay_host: String,

    /// ffmpeg executable
    #[arg(long = "ffmpeg", env = "FFMPEG_PATH", default_value = "ffmpeg")]
    ffmpeg_path: String,

    /// Frames queued per telemetry subscriber
    #[arg(long, env = "SUBSCRIBER_QUEUE", default_value = "256")]
    subscriber_queue: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (pretty, json)
    #[arg(long, env = "LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(&LoggingConfig {
        level: args.log_level,
        format: args.log_format,
    })?;

    let config = ServerConfig::with_addr(args.bind)
        .relay_host(args.relay_host)
        .ffmpeg_path(args.ffmpeg_path)
        .subscriber_queue_capacity(args.subscriber_queue);

    let server = BridgeServer::new(config);
    server.run_until(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for a shutdown signal (SIGTERM or SIGINT/Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
