//! Cache backend implementations.
//!
//! Backends expose list-shaped storage: the shared window is an ordered
//! sequence of string items under one key, and timing histories are bounded
//! lists under per-strategy keys.

use crate::error::Result;
use std::time::Duration;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisBackend, RedisConfig};

/// Remaining time-to-live of a key.
///
/// "No expiry" and "absent/expired" are distinguishable sentinel states,
/// not ordinary integers. Mirrors the Redis TTL convention (-1 / -2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TtlState {
    /// Key exists and expires in this many seconds.
    Remaining(u64),
    /// Key exists with no expiry set.
    Persistent,
    /// Key is absent or already expired.
    Missing,
}

impl TtlState {
    /// Remaining seconds, if the key exists and has an expiry.
    pub fn as_secs(&self) -> Option<u64> {
        match self {
            TtlState::Remaining(secs) => Some(*secs),
            _ => None,
        }
    }
}

/// Trait for cache backend implementations.
///
/// Abstracts list-valued storage, allowing swappable backends.
/// Implementations: InMemory (default), Redis.
///
/// **IMPORTANT:** All methods use `&self` to allow concurrent access.
/// Backend implementations should use interior mutability or external
/// storage.
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Read up to `count` items from the head of the list, in stored order.
    ///
    /// `count == 0` reads the whole list.
    ///
    /// # Returns
    /// An empty vec when the key is absent or expired. That is a genuine
    /// miss, never an error.
    ///
    /// # Errors
    /// Returns `Err` only on backend failure (connection lost, etc.)
    async fn read_range(&self, key: &str, count: usize) -> Result<Vec<String>>;

    /// Replace the whole list under `key`: delete, bulk-append `items` in
    /// order, then set the expiry.
    ///
    /// Idempotent: calling twice with the same input yields the same
    /// observable state. Every successful call resets the TTL countdown,
    /// regardless of time remaining on the previous list. An empty `items`
    /// leaves the key deleted.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn replace_list(&self, key: &str, items: Vec<String>, ttl: Duration) -> Result<()>;

    /// Push one item onto the head of the list, creating it if absent.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn push_front(&self, key: &str, item: String) -> Result<()>;

    /// Trim the list to its first `max_len` items (head retained).
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn trim_list(&self, key: &str, max_len: usize) -> Result<()>;

    /// Current number of items in the list (0 if absent or expired).
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn list_len(&self, key: &str) -> Result<usize>;

    /// Remaining TTL of the key.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn ttl(&self, key: &str) -> Result<TtlState>;

    /// Remove the key.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys matching a glob pattern (admin surface).
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs or pattern is unsupported
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Health check - verify backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: Clear all keys (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if operation is not implemented or fails
    async fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}
