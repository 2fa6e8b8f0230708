//! Registry configuration

use super::key::StreamKey;

/// Default RTSP relay server (host:port)
pub const DEFAULT_RELAY_HOST: &str = "localhost:8554";

/// Default transcoder executable, resolved through `PATH`
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

/// Audio codec the transcoder converts to
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// Configuration for the stream registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Relay server the transcoder publishes to
    pub relay_host: String,

    /// Path to the ffmpeg executable
    pub ffmpeg_path: String,

    /// Audio codec passed to `-c:a`
    pub audio_codec: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            relay_host: DEFAULT_RELAY_HOST.to_string(),
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Set the relay host
    pub fn relay_host(mut self, host: impl Into<String>) -> Self {
        self.relay_host = host.into();
        self
    }

    /// Set the ffmpeg executable
    pub fn ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    /// Build the relay URL a stream is published to
    pub fn relay_url(&self, key: &StreamKey) -> String {
        format!("rtsp://{}/{}", self.relay_host, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.relay_host, "localhost:8554");
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.audio_codec, "aac");
    }

    #[test]
    fn test_relay_url() {
        let config = RegistryConfig::default();

        assert_eq!(
            config.relay_url(&StreamKey::new("keyA")),
            "rtsp://localhost:8554/keyA"
        );
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .relay_host("mediamtx:8554")
            .ffmpeg_path("/usr/local/bin/ffmpeg");

        assert_eq!(config.ffmpeg_path, "/usr/local/bin/ffmpeg");
        assert_eq!(
            config.relay_url(&StreamKey::new("cam")),
            "rtsp://mediamtx:8554/cam"
        );
    }
}
