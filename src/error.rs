//! Error types for the fetch coordinator.

use std::fmt;

/// Result type for fetch and cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the crate.
///
/// Propagation policy: only `InvalidRequest` and `StoreUnavailable` reach
/// the caller of a fetch as failures. Cache-layer faults (`CacheUnavailable`,
/// `DeserializationError`) are absorbed inside the coordinator and degrade
/// gracefully.
#[derive(Debug, Clone)]
pub enum Error {
    /// Request could not be interpreted: unrecognized strategy name or a
    /// malformed parameter. Reported synchronously, no I/O attempted.
    InvalidRequest(String),

    /// Primary store could not be reached or the query failed.
    ///
    /// Fatal to the invocation; no silent fallback to cache-only data.
    /// Surfaced with whatever partial timings were accumulated.
    StoreUnavailable(String),

    /// Cache backend is unavailable (connection lost, protocol error).
    ///
    /// Distinct from a genuine cache miss, which is an empty read.
    /// In a read context the coordinator recovers by treating this as a
    /// miss; in a write context it logs and discards.
    CacheUnavailable(String),

    /// Serialization failed when encoding an entity or timing entry.
    SerializationError(String),

    /// Deserialization failed when decoding a cached item.
    ///
    /// A single bad item is dropped from the window, not fatal to the read.
    DeserializationError(String),

    /// Configuration error during backend construction.
    ConfigError(String),

    /// Feature not implemented or not enabled for this backend.
    NotImplemented(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Error::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            Error::CacheUnavailable(msg) => write!(f, "Cache unavailable: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::CacheUnavailable(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::CacheUnavailable(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::CacheUnavailable(format!("Redis error: {}", e))
    }
}
