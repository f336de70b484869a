//! Bounded per-strategy timing histories.

use crate::backend::CacheBackend;
use crate::error::Result;
use crate::strategy::FetchStrategy;
use crate::timing::TimingEntry;

/// Maximum number of timing samples kept per strategy.
///
/// Histories are bounded rings: newest at the head, oldest evicted.
pub const HISTORY_CAP: usize = 100;

/// Appends timing samples to bounded per-strategy histories and reads them
/// back for reporting.
///
/// Recording is fire-and-forget relative to the fetch path: the coordinator
/// logs and swallows a recorder failure, so a broken history never fails a
/// fetch that already has a valid result in hand.
#[derive(Clone)]
pub struct TimingRecorder<B: CacheBackend> {
    backend: B,
}

impl<B: CacheBackend> TimingRecorder<B> {
    /// Create a recorder over `backend`.
    pub fn new(backend: B) -> Self {
        TimingRecorder { backend }
    }

    /// Append one entry to the head of the strategy's history and trim it
    /// to the most recent `HISTORY_CAP` entries.
    ///
    /// # Errors
    /// Returns `Err` on encoding or backend failure. The caller decides
    /// whether that is fatal; the coordinator never treats it as such.
    pub async fn record(&self, strategy: FetchStrategy, entry: TimingEntry) -> Result<()> {
        let key = strategy.history_key();
        let raw = serde_json::to_string(&entry)
            .map_err(|e| crate::error::Error::SerializationError(e.to_string()))?;

        self.backend.push_front(&key, raw).await?;
        self.backend.trim_list(&key, HISTORY_CAP).await?;

        debug!("Recorded {}ms for strategy {}", entry.total, strategy);
        Ok(())
    }

    /// Read the full history for one strategy, newest first.
    ///
    /// Entries that fail to decode are logged and dropped.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn history(&self, strategy: FetchStrategy) -> Result<Vec<TimingEntry>> {
        let key = strategy.history_key();
        let raw = self.backend.read_range(&key, 0).await?;

        let mut entries = Vec::with_capacity(raw.len());
        for item in &raw {
            match serde_json::from_str::<TimingEntry>(item) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Dropping undecodable timing entry in {}: {}", key, e),
            }
        }
        Ok(entries)
    }

    /// Backend reference (shared with the window in the reference setup).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
