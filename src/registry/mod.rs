//! Stream registry with transcoder supervision
//!
//! The registry owns one `ffmpeg` process per stream key and serializes
//! start, stop and status under a single lock.
//!
//! # Architecture
//!
//! ```text
//!                  Arc<StreamRegistry>
//!             ┌──────────────────────────┐
//!             │ streams: Mutex<HashMap<  │
//!             │   StreamKey,             │
//!             │   StreamInfo {           │
//!             │     source_url,          │
//!             │     relay_url,           │
//!             │     process,             │
//!             │   }                      │
//!             │ >>                       │
//!             └────────────┬─────────────┘
//!                          │
//!        ┌─────────────────┼─────────────────┐
//!        ▼                 ▼                 ▼
//!   POST /start       POST /stop        GET /status
//!   check, spawn,     kill, remove,     try_wait per
//!   insert            reap              entry
//!        │
//!        ▼
//!   ffmpeg -i rtmp://... -f rtsp rtsp://<relay>/<key>
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{StreamInfo, StreamStatus};
pub use error::RegistryError;
pub use key::StreamKey;
pub use store::StreamRegistry;
