//! Hybrid fetch coordinator - orchestrates the three retrieval strategies.
//!
//! Per invocation the coordinator walks a fixed state machine:
//!
//! ```text
//! Start -> ReadCache -> (Sufficient | Insufficient)
//!       -> [ReadStore] -> [Merge] -> [WriteCache] -> Done
//! ```
//!
//! with phases strictly ordered (later phases depend on earlier results) and
//! every store/cache call awaited sequentially. No state persists between
//! invocations beyond what lives in the cache window and the store.
//!
//! # Concurrency
//!
//! There is no mutual exclusion across invocations: two concurrent hybrid
//! fetches may both observe an insufficient window, both query the store,
//! and both overwrite the window. The last writer's window wins with no
//! merge across invocations. This is an accepted, documented limitation of
//! the reference behavior; callers wanting stronger guarantees should add a
//! per-key single-flight lease around `ReadStore..WriteCache` (an extension
//! point, deliberately not implemented here).

use crate::backend::{CacheBackend, TtlState};
use crate::entity::FetchEntity;
use crate::error::{Error, Result};
use crate::recorder::TimingRecorder;
use crate::store::PrimaryStore;
use crate::strategy::{FetchStrategy, ResolvedSource};
use crate::timing::{measured, now_ms, PhaseTimings, TimingEntry};
use crate::window::CacheWindow;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// TTL applied to the window on every repopulation: 24 hours.
///
/// Always reset to this fixed value on write, never extended incrementally.
pub const WINDOW_TTL: Duration = Duration::from_secs(86_400);

/// One fetch invocation request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FetchRequest {
    pub strategy: FetchStrategy,
    /// Requested entity count. Non-positive means "zero items": the fetch
    /// succeeds with an empty result and performs no I/O.
    pub limit: i64,
}

/// Structured result of one fetch invocation.
///
/// Constructed fresh per invocation and never persisted (only its total
/// duration is, as a `TimingEntry`). A failed invocation comes back with
/// `succeeded = false`, a human-readable message, zero entities, and
/// whatever partial timings were accumulated; nothing panics past the
/// invocation boundary.
#[derive(Clone, Debug, Serialize)]
pub struct FetchResponse<T> {
    pub succeeded: bool,
    pub entities: Vec<T>,
    pub count: usize,
    /// The strategy the caller asked for.
    pub requested: FetchStrategy,
    /// The source that actually served the result.
    pub resolved: ResolvedSource,
    /// Whether the cache alone met the target count.
    pub cache_hit: bool,
    pub ttl_remaining: Option<TtlState>,
    pub timings: PhaseTimings,
    pub error: Option<String>,
}

/// What a strategy handler produced, before response assembly.
struct Outcome<T> {
    entities: Vec<T>,
    resolved: ResolvedSource,
    cache_hit: bool,
    ttl_remaining: Option<TtlState>,
}

fn mirror(strategy: FetchStrategy) -> ResolvedSource {
    match strategy {
        FetchStrategy::Store => ResolvedSource::Store,
        FetchStrategy::Cache => ResolvedSource::Cache,
        FetchStrategy::Hybrid => ResolvedSource::Hybrid,
    }
}

fn as_store_unavailable(e: Error) -> Error {
    match e {
        Error::StoreUnavailable(_) => e,
        other => Error::StoreUnavailable(other.to_string()),
    }
}

/// Orchestrates store-only, cache-only, and hybrid fetches over one shared
/// cache window, measuring per-phase timings and recording totals.
///
/// All collaborators are injected explicitly - there is no ambient client -
/// so tests can substitute doubles for the window, the store, and the
/// recorder backend.
///
/// # Example
///
/// ```ignore
/// let backend = InMemoryBackend::new();
/// let coordinator = FetchCoordinator::new(
///     CacheWindow::new(backend.clone()),
///     store,
///     TimingRecorder::new(backend),
/// );
///
/// let response = coordinator
///     .fetch(FetchRequest { strategy: FetchStrategy::Hybrid, limit: 10 })
///     .await;
/// ```
pub struct FetchCoordinator<T, B, S>
where
    T: FetchEntity,
    B: CacheBackend,
    S: PrimaryStore<T>,
{
    window: CacheWindow<T, B>,
    store: S,
    recorder: TimingRecorder<B>,
}

impl<T, B, S> FetchCoordinator<T, B, S>
where
    T: FetchEntity,
    B: CacheBackend,
    S: PrimaryStore<T>,
{
    /// Create a coordinator from its three collaborators.
    pub fn new(window: CacheWindow<T, B>, store: S, recorder: TimingRecorder<B>) -> Self {
        FetchCoordinator {
            window,
            store,
            recorder,
        }
    }

    /// The shared cache window.
    pub fn window(&self) -> &CacheWindow<T, B> {
        &self.window
    }

    /// The timing recorder (shares the window's backend in the reference
    /// setup).
    pub fn recorder(&self) -> &TimingRecorder<B> {
        &self.recorder
    }

    /// Execute one fetch invocation.
    ///
    /// Never returns an error: failures are folded into the response. Only
    /// store unavailability fails an invocation; cache faults degrade (read
    /// failure acts as a miss, write failure is logged and swallowed since
    /// the caller already has a valid result in hand).
    pub async fn fetch(&self, request: FetchRequest) -> FetchResponse<T> {
        let started = Instant::now();
        let mut timings = PhaseTimings::default();

        debug!(
            "Fetch start: strategy={}, limit={}",
            request.strategy, request.limit
        );

        // Zero items requested: skip all I/O, succeed with an empty result.
        if request.limit <= 0 {
            timings.total_ms = started.elapsed().as_millis() as u64;
            return FetchResponse {
                succeeded: true,
                entities: Vec::new(),
                count: 0,
                requested: request.strategy,
                resolved: mirror(request.strategy),
                cache_hit: false,
                ttl_remaining: None,
                timings,
                error: None,
            };
        }

        let limit = request.limit as usize;
        let result = match request.strategy {
            FetchStrategy::Store => self.run_store(limit, &mut timings).await,
            FetchStrategy::Cache => self.run_cache(limit, &mut timings).await,
            FetchStrategy::Hybrid => self.run_hybrid(limit, &mut timings).await,
        };

        timings.total_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                // Fire-and-forget relative to the fetch: a recorder failure
                // never fails a fetch that already has its result.
                let entry = TimingEntry {
                    timestamp: now_ms(),
                    total: timings.total_ms,
                };
                if let Err(e) = self.recorder.record(request.strategy, entry).await {
                    warn!("Failed to record fetch timing: {}", e);
                }

                info!(
                    "Fetch done: strategy={}, resolved={}, hit={}, count={}, total={}ms",
                    request.strategy,
                    outcome.resolved,
                    outcome.cache_hit,
                    outcome.entities.len(),
                    timings.total_ms
                );

                FetchResponse {
                    succeeded: true,
                    count: outcome.entities.len(),
                    entities: outcome.entities,
                    requested: request.strategy,
                    resolved: outcome.resolved,
                    cache_hit: outcome.cache_hit,
                    ttl_remaining: outcome.ttl_remaining,
                    timings,
                    error: None,
                }
            }
            Err(e) => {
                error!("Fetch failed: strategy={}: {}", request.strategy, e);
                FetchResponse {
                    succeeded: false,
                    entities: Vec::new(),
                    count: 0,
                    requested: request.strategy,
                    resolved: mirror(request.strategy),
                    cache_hit: false,
                    ttl_remaining: None,
                    timings,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Store-only: skip the cache read, query the store, unconditionally
    /// replace the window with exactly what came back (even a short or
    /// empty result), and reset the TTL.
    async fn run_store(&self, limit: usize, timings: &mut PhaseTimings) -> Result<Outcome<T>> {
        let rows = measured(&mut timings.store_query_ms, self.store.query(limit))
            .await
            .map_err(as_store_unavailable)?;

        self.write_window(&rows, &mut timings.cache_write_ms).await;

        Ok(Outcome {
            entities: rows,
            resolved: ResolvedSource::Store,
            cache_hit: false,
            ttl_remaining: None,
        })
    }

    /// Cache-only: serve the window if it holds anything at all. An empty
    /// window degrades to the store path for this invocation - a deliberate
    /// availability trade-off, without which the demo is unusable on cold
    /// start. Report comparisons across strategies depend on exactly this
    /// behavior.
    async fn run_cache(&self, limit: usize, timings: &mut PhaseTimings) -> Result<Outcome<T>> {
        let cached = self
            .read_window_lenient(limit, &mut timings.cache_read_ms)
            .await;

        if !cached.is_empty() {
            let ttl_remaining = self.read_ttl(&mut timings.cache_read_ms).await;
            return Ok(Outcome {
                entities: cached,
                resolved: ResolvedSource::Cache,
                cache_hit: true,
                ttl_remaining,
            });
        }

        debug!("Cache empty, degrading cache-only fetch to the store path");
        self.run_store(limit, timings).await
    }

    /// Hybrid cache-aside: serve entirely from cache when the window covers
    /// the requested count; otherwise top up from the store, merge cached
    /// items first, and replace the window with the concatenation.
    ///
    /// The hit flag reflects whether the target count was met by cache
    /// alone, so a partial cache read still reports `cache_hit = false`.
    async fn run_hybrid(&self, limit: usize, timings: &mut PhaseTimings) -> Result<Outcome<T>> {
        let cached = self
            .read_window_lenient(limit, &mut timings.cache_read_ms)
            .await;

        if cached.len() >= limit {
            let mut entities = cached;
            entities.truncate(limit);
            let ttl_remaining = self.read_ttl(&mut timings.cache_read_ms).await;
            return Ok(Outcome {
                entities,
                resolved: ResolvedSource::Cache,
                cache_hit: true,
                ttl_remaining,
            });
        }

        let remaining = limit - cached.len();
        let fetched = if remaining > 0 {
            measured(&mut timings.store_query_ms, self.store.query(remaining))
                .await
                .map_err(as_store_unavailable)?
        } else {
            Vec::new()
        };

        // Cache order first, then store order; a short store result is
        // accepted as-is.
        let fetched_any = !fetched.is_empty();
        let mut combined = cached;
        combined.extend(fetched);

        if fetched_any {
            self.write_window(&combined, &mut timings.cache_write_ms)
                .await;
        }

        let ttl_remaining = self.read_ttl(&mut timings.cache_read_ms).await;
        Ok(Outcome {
            entities: combined,
            resolved: ResolvedSource::Hybrid,
            cache_hit: false,
            ttl_remaining,
        })
    }

    /// Read up to `limit` entities; a backend failure is logged and treated
    /// as a miss so the invocation can continue via the store path.
    async fn read_window_lenient(&self, limit: usize, bucket: &mut u64) -> Vec<T> {
        match measured(bucket, self.window.read_window(limit)).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!("Cache read failed, treating as miss: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the window; a failure is logged and swallowed - the caller
    /// already holds a valid result.
    async fn write_window(&self, entities: &[T], bucket: &mut u64) {
        if let Err(e) = measured(bucket, self.window.replace_window(entities, WINDOW_TTL)).await {
            warn!("Cache repopulation failed, result is served anyway: {}", e);
        }
    }

    /// Read the window TTL; a failure is logged and reported as unknown.
    async fn read_ttl(&self, bucket: &mut u64) -> Option<TtlState> {
        match measured(bucket, self.window.remaining_ttl()).await {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("TTL read failed: {}", e);
                None
            }
        }
    }
}
