//! Registry error types
//!
//! Error types for stream registry operations.

use std::io;

use super::key::StreamKey;

/// Error type for registry operations
#[derive(Debug)]
pub enum RegistryError {
    /// A stream with this key is already registered
    Conflict(StreamKey),
    /// No stream with this key
    NotFound(StreamKey),
    /// The transcoder could not be started
    SpawnFailed(StreamKey, io::Error),
    /// The transcoder could not be killed; the entry is kept
    StopFailed(StreamKey, io::Error),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Conflict(_) => write!(f, "stream already running"),
            RegistryError::NotFound(_) => write!(f, "stream not found"),
            RegistryError::SpawnFailed(_, e) => write!(f, "{}", e),
            RegistryError::StopFailed(_, e) => write!(f, "failed to stop process: {}", e),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::SpawnFailed(_, e) | RegistryError::StopFailed(_, e) => Some(e),
            _ => None,
        }
    }
}
