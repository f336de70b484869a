//! Typed cache window over a raw backend.
//!
//! The window is the single shared, list-valued cache entry all strategies
//! read and repopulate. Writes are always whole-window replacements (clear,
//! bulk-append, set expiry); there are no partial in-place updates, so the
//! stored order is the insertion order of the most recent full
//! repopulation.

use crate::backend::{CacheBackend, TtlState};
use crate::entity::{decode_item, encode_item, FetchEntity};
use crate::error::Result;
use std::marker::PhantomData;
use std::time::Duration;

/// Default key for the shared window.
pub const DEFAULT_WINDOW_KEY: &str = "products";

/// Ordered window of entities under one logical cache key.
///
/// An explicit dependency injected into the coordinator - there is no
/// ambient/static cache client - which keeps the window swappable for test
/// doubles.
#[derive(Clone)]
pub struct CacheWindow<T: FetchEntity, B: CacheBackend> {
    backend: B,
    key: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T: FetchEntity, B: CacheBackend> CacheWindow<T, B> {
    /// Create a window over `backend` with the default key.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_WINDOW_KEY)
    }

    /// Create a window over `backend` with a custom key.
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        CacheWindow {
            backend,
            key: key.into(),
            _entity: PhantomData,
        }
    }

    /// The logical cache key this window lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Backend reference (for advanced use and the admin surface).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read up to `count` entities from the window, in stored order.
    ///
    /// Items that fail to decode are logged and dropped from the result;
    /// they do not count toward the satisfied quantity and do not abort the
    /// read. An absent or expired key reads as an empty window, which is a
    /// genuine miss, not an error.
    ///
    /// # Errors
    /// Returns `Err(Error::CacheUnavailable)` on backend failure.
    pub async fn read_window(&self, count: usize) -> Result<Vec<T>> {
        let raw = self.backend.read_range(&self.key, count).await?;
        let mut entities = Vec::with_capacity(raw.len());
        for item in &raw {
            match decode_item::<T>(item) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Dropping undecodable item in window {}: {}", self.key, e);
                }
            }
        }
        debug!(
            "Window {} read: {} raw items, {} decoded",
            self.key,
            raw.len(),
            entities.len()
        );
        Ok(entities)
    }

    /// Remaining TTL of the window key.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn remaining_ttl(&self) -> Result<TtlState> {
        self.backend.ttl(&self.key).await
    }

    /// Replace the whole window with `entities` in order and reset the TTL.
    ///
    /// All entities are encoded before anything is written, so an encoding
    /// failure never leaves a half-written window. Idempotent; the TTL
    /// countdown restarts on every successful call, never extended
    /// incrementally.
    ///
    /// # Errors
    /// Returns `Err(Error::SerializationError)` if an entity cannot be
    /// encoded, or `Err(Error::CacheUnavailable)` on backend failure.
    pub async fn replace_window(&self, entities: &[T], ttl: Duration) -> Result<()> {
        let mut items = Vec::with_capacity(entities.len());
        for entity in entities {
            items.push(encode_item(entity)?);
        }
        self.backend.replace_list(&self.key, items, ttl).await?;
        debug!(
            "Window {} replaced: {} items (TTL: {:?})",
            self.key,
            entities.len(),
            ttl
        );
        Ok(())
    }

    /// Number of items currently in the window (including undecodable ones).
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn len(&self) -> Result<usize> {
        self.backend.list_len(&self.key).await
    }

    /// True when the window holds no items.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Delete the window key entirely (admin surface).
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn clear(&self) -> Result<()> {
        self.backend.delete(&self.key).await
    }
}
