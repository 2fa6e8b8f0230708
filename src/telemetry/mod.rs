//! Telemetry side channel
//!
//! Events posted over HTTP are encoded once and fanned out to every live
//! WebSocket subscriber.
//!
//! ```text
//!   POST /api/telemetry
//!          │
//!          ▼
//!   TelemetryBroadcaster::publish()
//!          │  snapshot queues under lock, send outside it (waits on full)
//!   ┌──────┼──────────────┐
//!   ▼      ▼              ▼
//!  [queue] [queue]  ...  [queue]
//!   │      │              │
//!  writer writer        writer  ──► WebSocket text frame
//! ```
//!
//! Subscribers are removed only by their own connection loop when the read
//! side of the socket ends.

pub mod broadcaster;
pub mod config;
pub mod event;
pub mod session;

pub use broadcaster::{SubscriberId, TelemetryBroadcaster};
pub use config::TelemetryConfig;
pub use event::TelemetryEvent;
pub use session::run_subscription;
