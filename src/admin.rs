//! Administrative operations consumed by the out-of-core UI panel.
//!
//! These sit at the interface boundary: key introspection for the cache
//! panel, plus the "clear" actions. None of them are on the fetch path.

use crate::backend::{CacheBackend, TtlState};
use crate::error::Result;
use serde::Serialize;

/// How many raw items `window_info` samples from the head of the window.
const SAMPLE_LEN: usize = 5;

/// Snapshot of the shared window key for display.
#[derive(Clone, Debug, Serialize)]
pub struct WindowInfo {
    pub key: String,
    pub ttl: TtlState,
    pub length: usize,
    /// Approximate payload size of the sampled items, in bytes.
    pub sample_bytes: usize,
    /// Up to the first five raw items, undecoded.
    pub sample: Vec<String>,
}

/// Inspect the window key: TTL, length, and a small sample of raw items.
///
/// # Errors
/// Returns `Err` on backend failure.
pub async fn window_info<B: CacheBackend>(backend: &B, key: &str) -> Result<WindowInfo> {
    let ttl = backend.ttl(key).await?;
    let length = backend.list_len(key).await?;
    let sample = backend.read_range(key, SAMPLE_LEN).await?;
    let sample_bytes = sample.iter().map(|s| s.len()).sum();

    Ok(WindowInfo {
        key: key.to_string(),
        ttl,
        length,
        sample_bytes,
        sample,
    })
}

/// Delete every key matching `pattern`, returning how many were removed.
///
/// The reference system's "clear all" action uses pattern `"*"`.
///
/// # Errors
/// Returns `Err` on backend failure.
pub async fn flush_keys<B: CacheBackend>(backend: &B, pattern: &str) -> Result<usize> {
    let keys = backend.keys(pattern).await?;
    for key in &keys {
        backend.delete(key).await?;
    }
    info!("Flushed {} keys matching '{}'", keys.len(), pattern);
    Ok(keys.len())
}
