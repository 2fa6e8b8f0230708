//! Stream key type
//!
//! Identifies one ingest to relay pipeline in the registry.

/// Caller-supplied identifier for a relayed stream
///
/// The key is also the path component of the relay URL, so the registry
/// never holds two entries with the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamKey(String);

impl StreamKey {
    /// Create a new stream key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty (rejected at the request boundary)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for StreamKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for StreamKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl std::fmt::Display for StreamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_key() {
        let key = StreamKey::new("drone-1");
        assert_eq!(key.to_string(), "drone-1");
        assert_eq!(key.as_str(), "drone-1");
    }

    #[test]
    fn test_empty_key() {
        assert!(StreamKey::from("").is_empty());
        assert!(!StreamKey::from(String::from("a")).is_empty());
    }
}
