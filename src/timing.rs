//! Per-invocation phase timing and the recorded timing entry.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Per-phase timing breakdown for one fetch invocation.
///
/// Constructed fresh per invocation; only `total_ms` is persisted (as a
/// `TimingEntry`), the phase split is reported to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTimings {
    /// Time spent querying the primary store.
    pub store_query_ms: u64,
    /// Time spent reading the cache window (including TTL reads).
    pub cache_read_ms: u64,
    /// Time spent replacing the cache window.
    pub cache_write_ms: u64,
    /// Wall-clock total for the whole invocation.
    pub total_ms: u64,
}

/// One recorded sample: when a fetch ran and how long it took in total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingEntry {
    /// Milliseconds since epoch at which the fetch completed.
    pub timestamp: i64,
    /// Total elapsed milliseconds for the invocation.
    pub total: u64,
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Await `fut`, accumulating its elapsed milliseconds into `bucket`.
///
/// The bucket is updated even when the wrapped phase fails, so partial
/// timings survive an aborted invocation. Buckets accumulate: wrapping two
/// phases with the same bucket sums their durations.
pub async fn measured<T, F>(bucket: &mut u64, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    *bucket += start.elapsed().as_millis() as u64;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_measured_accumulates_elapsed() {
        let mut bucket = 0u64;
        measured(&mut bucket, tokio::time::sleep(Duration::from_millis(20))).await;
        assert!(bucket >= 20);

        let before = bucket;
        measured(&mut bucket, tokio::time::sleep(Duration::from_millis(20))).await;
        assert!(bucket >= before + 20, "bucket should accumulate");
    }

    #[tokio::test]
    async fn test_measured_records_on_failure() {
        let mut bucket = 0u64;
        let result: Result<(), &str> = measured(&mut bucket, async {
            tokio::time::sleep(Duration::from_millis(15)).await;
            Err("boom")
        })
        .await;

        assert!(result.is_err());
        assert!(bucket >= 15, "failed phase must still be timed");
    }

    #[test]
    fn test_timing_entry_json_roundtrip() {
        let entry = TimingEntry {
            timestamp: 1_700_000_000_000,
            total: 42,
        };
        let raw = serde_json::to_string(&entry).unwrap();
        let back: TimingEntry = serde_json::from_str(&raw).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_now_ms_is_plausible() {
        // After 2023-01-01 in epoch milliseconds.
        assert!(now_ms() > 1_672_531_200_000);
    }
}
