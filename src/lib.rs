//! # fetchrace
//!
//! A cache-aside fetch coordinator that compares three data-retrieval
//! strategies - store-only, cache-only, and a hybrid merge-on-miss blend -
//! over one shared, list-valued cache window, recording per-invocation
//! timings into bounded histories for descriptive reporting.
//!
//! ## The three strategies
//!
//! - **Store**: query the primary store, then unconditionally repopulate
//!   the cache window with the result (24h TTL).
//! - **Cache**: serve the window as-is; an empty window degrades to the
//!   store path so the demo stays usable on cold start.
//! - **Hybrid**: serve from cache when it covers the requested count,
//!   otherwise fill the remainder from the store, merge cached-then-store,
//!   and replace the window with the concatenation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fetchrace::{
//!     backend::InMemoryBackend, CacheWindow, FetchCoordinator, FetchRequest,
//!     FetchStrategy, InMemoryStore, Product, TimingRecorder,
//! };
//!
//! let backend = InMemoryBackend::new();
//! let coordinator = FetchCoordinator::new(
//!     CacheWindow::new(backend.clone()),
//!     InMemoryStore::<Product>::seeded(rows),
//!     TimingRecorder::new(backend),
//! );
//!
//! let response = coordinator
//!     .fetch(FetchRequest { strategy: FetchStrategy::Hybrid, limit: 10 })
//!     .await;
//! assert!(response.succeeded);
//! ```
//!
//! Against a real deployment, swap `InMemoryBackend` for
//! [`backend::RedisBackend`] (feature `redis`) and implement
//! [`PrimaryStore`] over your database client.
//!
//! ## Failure semantics
//!
//! Only invalid requests and primary-store failures surface to the caller.
//! Cache faults degrade: a read failure acts as a miss, a write failure is
//! logged and swallowed, and a single corrupt cached item is dropped
//! without aborting the window read.

#[macro_use]
extern crate log;

pub mod admin;
pub mod backend;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod recorder;
pub mod report;
pub mod service;
pub mod store;
pub mod strategy;
pub mod timing;
pub mod window;

// Re-exports for convenience
pub use backend::{CacheBackend, TtlState};
pub use coordinator::{FetchCoordinator, FetchRequest, FetchResponse, WINDOW_TTL};
pub use entity::{FetchEntity, Product};
pub use error::{Error, Result};
pub use recorder::{TimingRecorder, HISTORY_CAP};
pub use report::{Report, ReportAggregator, StrategyStats};
pub use service::FetchService;
pub use store::{InMemoryStore, PrimaryStore};
pub use strategy::{FetchStrategy, ResolvedSource};
pub use timing::{PhaseTimings, TimingEntry};
pub use window::CacheWindow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
