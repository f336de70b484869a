//! Fetch strategies and the source that actually served a result.
//!
//! # The Three Strategies
//!
//! Every fetch uses one of three strategies:
//!
//! ```
//! use fetchrace::strategy::FetchStrategy;
//!
//! // 1. Store - read the primary store, repopulate the cache window
//! let _s = FetchStrategy::Store;
//!
//! // 2. Cache - serve from the cache window, degrade to store on cold start
//! let _s = FetchStrategy::Cache;
//!
//! // 3. Hybrid - cache-aside: partial cache reads are topped up from store
//! let _s = FetchStrategy::Hybrid;
//! ```
//!
//! | Strategy | Cache sufficient | Cache short/empty |
//! |----------|------------------|-------------------|
//! | **Store** | Store read, window replaced | Store read, window replaced |
//! | **Cache** | Serve cached items | Fall back to the store path |
//! | **Hybrid** | Serve first `limit` cached | Merge cache + store, replace window |
//!
//! The cache-only fallback is a deliberate availability trade-off: a pure
//! cache-only strategy would be unusable on cold start, so an empty window
//! degrades to the store path for that invocation. Timing comparisons
//! across strategies depend on this exact behavior.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed set of fetch strategies.
///
/// The declaration order (store, cache, hybrid) is the tie-break order used
/// when ranking strategies in reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Read the primary store; unconditionally repopulate the cache window.
    Store,
    /// Serve from the cache window; degrade to the store path when empty.
    Cache,
    /// Cache-aside merge: serve cached items first, fill the remainder from
    /// the store, then replace the window with the concatenation.
    Hybrid,
}

impl FetchStrategy {
    /// All strategies, in declaration (tie-break) order.
    pub const ALL: [FetchStrategy; 3] = [
        FetchStrategy::Store,
        FetchStrategy::Cache,
        FetchStrategy::Hybrid,
    ];

    /// Short name used in keys, logs, and wire payloads.
    pub fn name(&self) -> &'static str {
        match self {
            FetchStrategy::Store => "store",
            FetchStrategy::Cache => "cache",
            FetchStrategy::Hybrid => "hybrid",
        }
    }

    /// Key under which this strategy's timing history is stored.
    pub fn history_key(&self) -> String {
        format!("fetch_times:{}", self.name())
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FetchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" | "db" | "database" => Ok(FetchStrategy::Store),
            "cache" => Ok(FetchStrategy::Cache),
            "hybrid" => Ok(FetchStrategy::Hybrid),
            other => Err(Error::InvalidRequest(format!(
                "unknown strategy '{}': use \"store\", \"cache\", or \"hybrid\"",
                other
            ))),
        }
    }
}

/// The source that actually served a result.
///
/// May differ from the requested strategy: cache-only degrades to `Store`
/// on an empty window, and hybrid serves from `Cache` alone when the window
/// already covers the requested count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedSource {
    Store,
    Cache,
    Hybrid,
}

impl std::fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedSource::Store => f.write_str("store"),
            ResolvedSource::Cache => f.write_str("cache"),
            ResolvedSource::Hybrid => f.write_str("hybrid"),
        }
    }
}
