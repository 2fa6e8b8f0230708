//! Crate-level error type
//!
//! Request-scoped failures live in [`crate::registry::RegistryError`] and
//! [`crate::http::AppError`]; this type covers startup and serving.

use std::io;

/// Result alias for service-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service-level error
#[derive(Debug)]
pub enum Error {
    /// Binding or serving the listener failed
    Io(io::Error),
    /// Invalid configuration value
    Config(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Config(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
