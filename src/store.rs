//! Primary store adapter for the durable backing store.
//!
//! The `PrimaryStore` trait decouples the coordinator from any specific
//! database client. The store is read-only from the coordinator's
//! perspective; seeding is an external collaborator's job.
//!
//! # Implementing PrimaryStore
//!
//! Implement this trait for any storage backend: SQLx, tokio-postgres,
//! MongoDB drivers, or the in-memory implementation in this module for
//! testing.
//!
//! # Error Handling
//!
//! Return `Err(Error::StoreUnavailable)` for connectivity loss, query
//! timeouts, or any other fetch failure. A store that simply holds fewer
//! entities than requested returns the short result, which is not an error.

use crate::entity::FetchEntity;
use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Trait for primary store implementations.
///
/// Owns no cross-call state beyond its connection: every call is
/// self-contained.
#[allow(async_fn_in_trait)]
pub trait PrimaryStore<T: FetchEntity>: Send + Sync {
    /// Fetch up to `limit` entities, no filter, in the store's stable
    /// (but otherwise unspecified) order.
    ///
    /// # Returns
    /// A short (possibly empty) result when the store holds fewer than
    /// `limit` entities. Not an error and never retried.
    ///
    /// # Errors
    /// Returns `Err(Error::StoreUnavailable)` if the store cannot be
    /// reached or the query fails.
    async fn query(&self, limit: usize) -> Result<Vec<T>>;

    /// Whether the store holds any entities at all.
    ///
    /// Used by the out-of-core seeding collaborator, not by the fetch path.
    ///
    /// # Errors
    /// Returns `Err` if the store cannot be reached.
    async fn exists(&self) -> Result<bool> {
        Ok(!self.query(1).await?.is_empty())
    }
}

// ============================================================================
// In-Memory Test Store
// ============================================================================

/// In-memory primary store for tests and demos.
///
/// Keeps entities in insertion order and counts `query` invocations so
/// tests can assert that a strategy performed no store access.
#[derive(Clone)]
pub struct InMemoryStore<T: FetchEntity> {
    rows: Arc<RwLock<Vec<T>>>,
    query_calls: Arc<AtomicUsize>,
}

impl<T: FetchEntity> InMemoryStore<T> {
    /// Create a new empty store.
    pub fn new() -> Self {
        InMemoryStore {
            rows: Arc::new(RwLock::new(Vec::new())),
            query_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a store pre-seeded with `rows`, in order.
    pub fn seeded(rows: Vec<T>) -> Self {
        InMemoryStore {
            rows: Arc::new(RwLock::new(rows)),
            query_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Append one entity.
    pub fn insert(&self, row: T) {
        self.rows
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(row);
    }

    /// Number of entities currently held.
    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True if the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `query` calls observed so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

impl<T: FetchEntity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FetchEntity> PrimaryStore<T> for InMemoryStore<T> {
    async fn query(&self, limit: usize) -> Result<Vec<T>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.read().unwrap_or_else(|e| e.into_inner());
        Ok(rows.iter().take(limit).cloned().collect())
    }

    async fn exists(&self) -> Result<bool> {
        Ok(!self.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Product;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("product {}", id),
            price: 10.0,
            description: String::new(),
            company: "Acme".to_string(),
            avatar: String::new(),
            material: "wood".to_string(),
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_query_respects_limit_and_order() {
        let store = InMemoryStore::seeded(vec![product("a"), product("b"), product("c")]);

        let rows = store.query(2).await.expect("Failed to query");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[1].id, "b");
    }

    #[tokio::test]
    async fn test_query_short_result_is_not_an_error() {
        let store = InMemoryStore::seeded(vec![product("a")]);

        let rows = store.query(10).await.expect("Failed to query");
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_query_call_counter() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        assert_eq!(store.query_calls(), 0);

        store.query(5).await.unwrap();
        store.query(5).await.unwrap();
        assert_eq!(store.query_calls(), 2);
    }

    #[tokio::test]
    async fn test_poisoned_lock_recovers() {
        let store = InMemoryStore::seeded(vec![product("a")]);

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.rows.write().unwrap();
            panic!("poison the rows lock");
        })
        .join();

        // Reads and queries keep working on the recovered guard.
        assert_eq!(store.len(), 1);
        let rows = store.query(5).await.expect("Failed to query");
        assert_eq!(rows.len(), 1);

        store.insert(product("b"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_exists() {
        let store: InMemoryStore<Product> = InMemoryStore::new();
        assert!(!store.exists().await.unwrap());

        store.insert(product("a"));
        assert!(store.exists().await.unwrap());
    }
}
