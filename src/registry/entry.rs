//! Stream entry and status types
//!
//! This module defines the per-stream state stored in the registry.

use serde::Serialize;

use crate::process::{ProcessHandle, ProcessStatus};

use super::key::StreamKey;

/// Entry for a single relayed stream
///
/// Fixed at creation; the registry only inserts or removes whole entries.
#[derive(Debug)]
pub struct StreamInfo {
    /// Ingest URL the transcoder reads from
    pub source_url: String,

    /// Stream key
    pub stream_key: StreamKey,

    /// Relay URL the transcoder publishes to
    pub relay_url: String,

    /// The supervised transcoder
    pub(super) process: ProcessHandle,
}

impl StreamInfo {
    pub(super) fn new(
        stream_key: StreamKey,
        source_url: String,
        relay_url: String,
        process: ProcessHandle,
    ) -> Self {
        Self {
            source_url,
            stream_key,
            relay_url,
            process,
        }
    }

    /// Transcoder pid
    pub fn pid(&self) -> Option<u32> {
        self.process.pid()
    }

    /// Build a status row for this entry
    pub(super) fn snapshot(&mut self) -> StreamStatus {
        StreamStatus {
            stream_key: self.stream_key.to_string(),
            rtmp_url: self.source_url.clone(),
            rtsp_url: self.relay_url.clone(),
            status: self.process.status(),
        }
    }
}

/// One row of the status listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStatus {
    pub stream_key: String,
    pub rtmp_url: String,
    pub rtsp_url: String,
    pub status: ProcessStatus,
}
