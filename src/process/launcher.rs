//! Transcoder launch
//!
//! The registry never builds commands itself; it hands a [`TranscodeJob`] to a
//! [`ProcessLauncher`]. Production uses [`FfmpegLauncher`], tests inject their
//! own launchers to control timing and the spawned program.

use std::io;
use std::process::Stdio;

use futures::future::BoxFuture;
use tokio::process::Command;

use crate::registry::{RegistryConfig, StreamKey};

use super::handle::ProcessHandle;

/// One ingest to relay pipeline to launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    /// Stream key
    pub stream_key: StreamKey,
    /// Source (RTMP ingest) URL
    pub source_url: String,
    /// Target (RTSP relay) URL
    pub relay_url: String,
}

/// Spawns the external process for a job
pub trait ProcessLauncher: Send + Sync {
    /// Start the process; the returned handle is owned by the registry
    fn launch<'a>(&'a self, job: &'a TranscodeJob) -> BoxFuture<'a, io::Result<ProcessHandle>>;
}

/// Launches `ffmpeg` with the fixed relay argument template
#[derive(Debug, Clone)]
pub struct FfmpegLauncher {
    program: String,
    audio_codec: String,
}

impl FfmpegLauncher {
    /// Create a launcher from registry configuration
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            program: config.ffmpeg_path.clone(),
            audio_codec: config.audio_codec.clone(),
        }
    }

    /// Arguments passed to ffmpeg for a job
    ///
    /// Video is copied, audio is transcoded, output is RTSP over TCP.
    pub fn args(&self, job: &TranscodeJob) -> Vec<String> {
        [
            "-i",
            job.source_url.as_str(),
            "-c:v",
            "copy",
            "-c:a",
            self.audio_codec.as_str(),
            "-f",
            "rtsp",
            "-rtsp_transport",
            "tcp",
            job.relay_url.as_str(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn command(&self, job: &TranscodeJob) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl Default for FfmpegLauncher {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl ProcessLauncher for FfmpegLauncher {
    fn launch<'a>(&'a self, job: &'a TranscodeJob) -> BoxFuture<'a, io::Result<ProcessHandle>> {
        Box::pin(async move {
            let handle = ProcessHandle::spawn(&mut self.command(job))?;

            tracing::debug!(
                stream = %job.stream_key,
                pid = ?handle.pid(),
                program = %self.program,
                "Transcoder spawned"
            );

            Ok(handle)
        })
    }
}
