//! In-memory cache backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! TTL expiration is handled on access.

use super::{CacheBackend, TtlState};
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One list entry with optional expiration.
struct ListEntry {
    items: Vec<String>,
    expires_at: Option<Instant>,
}

impl ListEntry {
    fn new(items: Vec<String>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        ListEntry { items, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }

    fn remaining(&self) -> TtlState {
        match self.expires_at {
            None => TtlState::Persistent,
            Some(exp) => {
                let now = Instant::now();
                if now > exp {
                    TtlState::Missing
                } else {
                    TtlState::Remaining((exp - now).as_secs())
                }
            }
        }
    }
}

/// Thread-safe async in-memory list backend.
///
/// Cloning is cheap and clones share the same store, matching the sharing
/// semantics of a remote cache.
///
/// # Example
///
/// ```no_run
/// use fetchrace::backend::{CacheBackend, InMemoryBackend};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend
///         .replace_list("window", vec!["a".into(), "b".into()], Duration::from_secs(60))
///         .await?;
///
///     let items = backend.read_range("window", 0).await?;
///     assert_eq!(items, vec!["a".to_string(), "b".to_string()]);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, ListEntry>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Current number of live keys.
    pub fn key_count(&self) -> usize {
        self.store.iter().filter(|e| !e.is_expired()).count()
    }

    /// Drop an entry if it has expired, returning whether it is live.
    fn evict_if_expired(&self, key: &str) -> bool {
        let expired = self
            .store
            .get(key)
            .map(|entry| entry.is_expired())
            .unwrap_or(false);
        if expired {
            self.store.remove(key);
        }
        !expired
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Glob match supporting only the patterns the admin surface uses:
/// `*`, a literal key, or a `prefix*`.
fn glob_match(pattern: &str, key: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

impl CacheBackend for InMemoryBackend {
    async fn read_range(&self, key: &str, count: usize) -> Result<Vec<String>> {
        if !self.evict_if_expired(key) {
            debug!("InMemory LRANGE {} -> expired", key);
            return Ok(Vec::new());
        }
        let items = match self.store.get(key) {
            Some(entry) => {
                let take = if count == 0 { entry.items.len() } else { count };
                entry.items.iter().take(take).cloned().collect()
            }
            None => Vec::new(),
        };
        debug!("InMemory LRANGE {} -> {} items", key, items.len());
        Ok(items)
    }

    async fn replace_list(&self, key: &str, items: Vec<String>, ttl: Duration) -> Result<()> {
        if items.is_empty() {
            self.store.remove(key);
            debug!("InMemory REPLACE {} -> empty, key deleted", key);
            return Ok(());
        }
        let len = items.len();
        self.store
            .insert(key.to_string(), ListEntry::new(items, Some(ttl)));
        debug!("InMemory REPLACE {} -> {} items (TTL: {:?})", key, len, ttl);
        Ok(())
    }

    async fn push_front(&self, key: &str, item: String) -> Result<()> {
        self.evict_if_expired(key);
        self.store
            .entry(key.to_string())
            .or_insert_with(|| ListEntry::new(Vec::new(), None))
            .items
            .insert(0, item);
        debug!("InMemory LPUSH {}", key);
        Ok(())
    }

    async fn trim_list(&self, key: &str, max_len: usize) -> Result<()> {
        if let Some(mut entry) = self.store.get_mut(key) {
            entry.items.truncate(max_len);
        }
        debug!("InMemory LTRIM {} -> {}", key, max_len);
        Ok(())
    }

    async fn list_len(&self, key: &str) -> Result<usize> {
        if !self.evict_if_expired(key) {
            return Ok(0);
        }
        Ok(self.store.get(key).map(|e| e.items.len()).unwrap_or(0))
    }

    async fn ttl(&self, key: &str) -> Result<TtlState> {
        let state = self
            .store
            .get(key)
            .map(|entry| entry.remaining())
            .unwrap_or(TtlState::Missing);
        if state == TtlState::Missing {
            self.store.remove(key);
        }
        Ok(state)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("InMemory DELETE {}", key);
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let keys = self
            .store
            .iter()
            .filter(|e| !e.is_expired() && glob_match(pattern, e.key()))
            .map(|e| e.key().clone())
            .collect();
        Ok(keys)
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory backend is always healthy
        Ok(true)
    }

    async fn clear_all(&self) -> Result<()> {
        self.store.clear();
        warn!("InMemory CLEAR_ALL executed - all keys removed");
        Ok(())
    }
}
