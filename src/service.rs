//! Shared fetch service handle for web applications.
//!
//! Wraps the coordinator in `Arc` so it can be cloned into handlers and
//! spawned tasks without external locking.

use crate::backend::CacheBackend;
use crate::coordinator::{FetchCoordinator, FetchRequest, FetchResponse};
use crate::entity::FetchEntity;
use crate::report::ReportAggregator;
use crate::store::PrimaryStore;
use std::sync::Arc;

/// Cloneable handle over a shared `FetchCoordinator`.
///
/// The coordinator's methods take `&self` and its collaborators use
/// interior mutability, so a plain `Arc` suffices - no `Mutex` wrapper.
///
/// # Example
///
/// ```ignore
/// let service = FetchService::new(coordinator);
///
/// let handle = service.clone(); // cheap - just an Arc increment
/// tokio::spawn(async move {
///     let response = handle
///         .fetch(FetchRequest { strategy: FetchStrategy::Hybrid, limit: 10 })
///         .await;
/// });
/// ```
pub struct FetchService<T, B, S>
where
    T: FetchEntity,
    B: CacheBackend,
    S: PrimaryStore<T>,
{
    coordinator: Arc<FetchCoordinator<T, B, S>>,
}

impl<T, B, S> Clone for FetchService<T, B, S>
where
    T: FetchEntity,
    B: CacheBackend,
    S: PrimaryStore<T>,
{
    fn clone(&self) -> Self {
        FetchService {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

impl<T, B, S> FetchService<T, B, S>
where
    T: FetchEntity,
    B: CacheBackend,
    S: PrimaryStore<T>,
{
    /// Wrap a coordinator for sharing.
    pub fn new(coordinator: FetchCoordinator<T, B, S>) -> Self {
        FetchService {
            coordinator: Arc::new(coordinator),
        }
    }

    /// Execute one fetch invocation. See [`FetchCoordinator::fetch`].
    pub async fn fetch(&self, request: FetchRequest) -> FetchResponse<T> {
        self.coordinator.fetch(request).await
    }

    /// Build a report aggregator over the same timing histories.
    pub fn reporter(&self) -> ReportAggregator<B> {
        ReportAggregator::new(self.coordinator.recorder().clone())
    }

    /// Direct access to the underlying coordinator.
    pub fn coordinator(&self) -> &FetchCoordinator<T, B, S> {
        &self.coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::entity::Product;
    use crate::recorder::TimingRecorder;
    use crate::store::InMemoryStore;
    use crate::strategy::FetchStrategy;
    use crate::window::CacheWindow;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            price: 1.0,
            description: String::new(),
            company: String::new(),
            avatar: String::new(),
            material: String::new(),
            created_at: 0,
        }
    }

    fn service(
        rows: Vec<Product>,
    ) -> FetchService<Product, InMemoryBackend, InMemoryStore<Product>> {
        let backend = InMemoryBackend::new();
        FetchService::new(FetchCoordinator::new(
            CacheWindow::new(backend.clone()),
            InMemoryStore::seeded(rows),
            TimingRecorder::new(backend),
        ))
    }

    #[tokio::test]
    async fn test_service_fetch_delegates() {
        let service = service(vec![product("a")]);
        let response = service
            .fetch(FetchRequest {
                strategy: FetchStrategy::Store,
                limit: 1,
            })
            .await;
        assert!(response.succeeded);
        assert_eq!(response.count, 1);
    }

    #[tokio::test]
    async fn test_service_clones_share_coordinator() {
        let service1 = service(vec![product("a")]);
        let service2 = service1.clone();
        assert!(Arc::ptr_eq(&service1.coordinator, &service2.coordinator));
    }

    #[tokio::test]
    async fn test_service_shared_across_tasks() {
        let service = service(vec![product("a"), product("b")]);
        let mut handles = vec![];

        for _ in 0..5 {
            let handle = service.clone();
            handles.push(tokio::spawn(async move {
                let response = handle
                    .fetch(FetchRequest {
                        strategy: FetchStrategy::Hybrid,
                        limit: 2,
                    })
                    .await;
                assert!(response.succeeded);
            }));
        }

        for handle in handles {
            handle.await.expect("Task failed");
        }

        let report = service.reporter().report().await.unwrap();
        assert_eq!(report.hybrid.len(), 5);
    }
}
