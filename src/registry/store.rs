//! Stream registry implementation
//!
//! The central registry that maps stream keys to supervised transcoder
//! processes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::process::{FfmpegLauncher, ProcessLauncher, TranscodeJob};

use super::config::RegistryConfig;
use super::entry::{StreamInfo, StreamStatus};
use super::error::RegistryError;
use super::key::StreamKey;

/// Central registry for all relayed streams
///
/// A single mutex guards every read and write of the map. Spawning the
/// transcoder happens outside the lock, so the duplicate check in
/// [`StreamRegistry::start`] and the final insert are two separate critical
/// sections. Two concurrent starts of the same key can both pass the check;
/// the later insert then replaces the earlier entry and its process is no
/// longer supervised. This is logged when it happens.
pub struct StreamRegistry {
    /// Map of stream key to stream entry
    streams: Mutex<HashMap<StreamKey, StreamInfo>>,

    /// Spawns transcoders
    launcher: Arc<dyn ProcessLauncher>,

    /// Configuration
    config: RegistryConfig,
}

impl StreamRegistry {
    /// Create a new stream registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new stream registry launching ffmpeg as configured
    pub fn with_config(config: RegistryConfig) -> Self {
        let launcher = Arc::new(FfmpegLauncher::new(&config));
        Self::with_launcher(config, launcher)
    }

    /// Create a new stream registry with a custom process launcher
    pub fn with_launcher(config: RegistryConfig, launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            launcher,
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Start relaying a stream
    ///
    /// Spawns a transcoder reading `source_url` and publishing to the relay.
    /// Returns the relay URL.
    pub async fn start(
        &self,
        key: &StreamKey,
        source_url: &str,
    ) -> Result<String, RegistryError> {
        {
            let streams = self.streams.lock().await;
            if streams.contains_key(key) {
                tracing::warn!(stream = %key, "Stream already running");
                return Err(RegistryError::Conflict(key.clone()));
            }
        }

        let job = TranscodeJob {
            stream_key: key.clone(),
            source_url: source_url.to_string(),
            relay_url: self.config.relay_url(key),
        };

        let process = match self.launcher.launch(&job).await {
            Ok(process) => process,
            Err(e) => {
                tracing::error!(stream = %key, error = %e, "Failed to start transcoder");
                return Err(RegistryError::SpawnFailed(key.clone(), e));
            }
        };
        let pid = process.pid();

        let relay_url = job.relay_url.clone();
        let entry = StreamInfo::new(job.stream_key, job.source_url, job.relay_url, process);

        let displaced = self.streams.lock().await.insert(key.clone(), entry);

        if let Some(previous) = displaced {
            tracing::warn!(
                stream = %key,
                previous_pid = ?previous.pid(),
                pid = ?pid,
                "Concurrent start replaced an existing entry, previous transcoder is unsupervised"
            );
        }

        tracing::info!(
            stream = %key,
            rtmp_url = %source_url,
            rtsp_url = %relay_url,
            pid = ?pid,
            "Stream started"
        );

        Ok(relay_url)
    }

    /// Stop relaying a stream
    ///
    /// Kills the transcoder if it is still running and removes the entry.
    /// If the kill request fails the entry stays so the stop can be retried.
    pub async fn stop(&self, key: &StreamKey) -> Result<(), RegistryError> {
        let removed = {
            let mut streams = self.streams.lock().await;

            let Some(entry) = streams.get_mut(key) else {
                tracing::warn!(stream = %key, "Stream not found for stop");
                return Err(RegistryError::NotFound(key.clone()));
            };

            if entry.process.is_alive() {
                if let Err(e) = entry.process.kill() {
                    tracing::error!(stream = %key, error = %e, "Failed to stop transcoder");
                    return Err(RegistryError::StopFailed(key.clone(), e));
                }
            }

            streams.remove(key)
        };

        // Reap outside the lock
        if let Some(mut entry) = removed {
            if let Err(e) = entry.process.wait().await {
                tracing::warn!(stream = %key, error = %e, "Failed to reap transcoder");
            }
        }

        tracing::info!(stream = %key, "Stream stopped");
        Ok(())
    }

    /// Snapshot the status of every stream, sorted by key
    pub async fn status(&self) -> Vec<StreamStatus> {
        let mut rows: Vec<StreamStatus> = {
            let mut streams = self.streams.lock().await;
            streams.values_mut().map(StreamInfo::snapshot).collect()
        };
        rows.sort_by(|a, b| a.stream_key.cmp(&b.stream_key));

        tracing::info!(streams_count = rows.len(), "Status requested");
        rows
    }

    /// Check whether a stream is registered
    pub async fn contains(&self, key: &StreamKey) -> bool {
        self.streams.lock().await.contains_key(key)
    }

    /// Get total number of streams
    pub async fn stream_count(&self) -> usize {
        self.streams.lock().await.len()
    }

    /// Kill and reap every supervised transcoder, leaving the registry empty
    pub async fn stop_all(&self) {
        let drained: Vec<(StreamKey, StreamInfo)> = self.streams.lock().await.drain().collect();

        for (key, mut entry) in drained {
            match entry.process.terminate().await {
                Ok(()) => tracing::info!(stream = %key, "Stream stopped on shutdown"),
                Err(e) => {
                    tracing::warn!(stream = %key, error = %e, "Failed to stop transcoder on shutdown")
                }
            }
        }
    }
}

impl Default for StreamRegistry {
    fn default() -> Self {
        Self::new()
    }
}
