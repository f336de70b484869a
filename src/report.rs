//! Descriptive statistics over the recorded timing histories.

use crate::backend::CacheBackend;
use crate::error::Result;
use crate::recorder::TimingRecorder;
use crate::strategy::FetchStrategy;
use crate::timing::TimingEntry;
use serde::{Deserialize, Serialize};

/// The three timing histories, newest first (reporting interface).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Report {
    pub store: Vec<TimingEntry>,
    pub cache: Vec<TimingEntry>,
    pub hybrid: Vec<TimingEntry>,
}

/// Descriptive summary for one strategy's history.
///
/// Computed over the `total` field of each sample. No statistical
/// significance testing; this is a descriptive summary only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyStats {
    pub strategy: FetchStrategy,
    pub samples: usize,
    pub avg_ms: f64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl StrategyStats {
    fn from_history(strategy: FetchStrategy, history: &[TimingEntry]) -> Self {
        if history.is_empty() {
            return StrategyStats {
                strategy,
                samples: 0,
                avg_ms: 0.0,
                min_ms: 0,
                max_ms: 0,
            };
        }
        let sum: u64 = history.iter().map(|e| e.total).sum();
        StrategyStats {
            strategy,
            samples: history.len(),
            avg_ms: sum as f64 / history.len() as f64,
            min_ms: history.iter().map(|e| e.total).min().unwrap_or(0),
            max_ms: history.iter().map(|e| e.total).max().unwrap_or(0),
        }
    }
}

/// Reads the accumulated histories and computes per-strategy statistics.
///
/// Operates independently of the fetch path: it only ever reads, so it puts
/// no back-pressure on in-flight fetches.
#[derive(Clone)]
pub struct ReportAggregator<B: CacheBackend> {
    recorder: TimingRecorder<B>,
}

impl<B: CacheBackend> ReportAggregator<B> {
    /// Create an aggregator reading through `recorder`.
    pub fn new(recorder: TimingRecorder<B>) -> Self {
        ReportAggregator { recorder }
    }

    /// Read all three histories.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn report(&self) -> Result<Report> {
        Ok(Report {
            store: self.recorder.history(FetchStrategy::Store).await?,
            cache: self.recorder.history(FetchStrategy::Cache).await?,
            hybrid: self.recorder.history(FetchStrategy::Hybrid).await?,
        })
    }

    /// Per-strategy statistics, ranked ascending by mean total time (lower
    /// is better). Ties keep the strategy declaration order (store, cache,
    /// hybrid) via stable sort.
    ///
    /// # Errors
    /// Returns `Err` on backend failure.
    pub async fn aggregate(&self) -> Result<Vec<StrategyStats>> {
        let mut stats = Vec::with_capacity(FetchStrategy::ALL.len());
        for strategy in FetchStrategy::ALL {
            let history = self.recorder.history(strategy).await?;
            stats.push(StrategyStats::from_history(strategy, &history));
        }
        stats.sort_by(|a, b| {
            a.avg_ms
                .partial_cmp(&b.avg_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::timing::now_ms;

    async fn recorder_with(
        totals: &[(FetchStrategy, &[u64])],
    ) -> TimingRecorder<InMemoryBackend> {
        let recorder = TimingRecorder::new(InMemoryBackend::new());
        for (strategy, samples) in totals {
            for &total in *samples {
                recorder
                    .record(
                        *strategy,
                        TimingEntry {
                            timestamp: now_ms(),
                            total,
                        },
                    )
                    .await
                    .unwrap();
            }
        }
        recorder
    }

    #[tokio::test]
    async fn test_stats_avg_min_max() {
        let recorder = recorder_with(&[(FetchStrategy::Store, &[10, 20, 30])]).await;
        let aggregator = ReportAggregator::new(recorder);

        let stats = aggregator.aggregate().await.unwrap();
        let store = stats
            .iter()
            .find(|s| s.strategy == FetchStrategy::Store)
            .unwrap();
        assert_eq!(store.samples, 3);
        assert_eq!(store.avg_ms, 20.0);
        assert_eq!(store.min_ms, 10);
        assert_eq!(store.max_ms, 30);
    }

    #[tokio::test]
    async fn test_ranking_ascending_by_mean() {
        let recorder = recorder_with(&[
            (FetchStrategy::Store, &[40u64, 60][..]),
            (FetchStrategy::Cache, &[5, 15]),
            (FetchStrategy::Hybrid, &[20, 30]),
        ])
        .await;
        let aggregator = ReportAggregator::new(recorder);

        let ranked = aggregator.aggregate().await.unwrap();
        let order: Vec<FetchStrategy> = ranked.iter().map(|s| s.strategy).collect();
        assert_eq!(
            order,
            vec![
                FetchStrategy::Cache,
                FetchStrategy::Hybrid,
                FetchStrategy::Store
            ]
        );
    }

    #[tokio::test]
    async fn test_ranking_tie_break_is_declaration_order() {
        // All means equal: order must be store, cache, hybrid.
        let recorder = recorder_with(&[
            (FetchStrategy::Cache, &[10u64][..]),
            (FetchStrategy::Hybrid, &[10]),
            (FetchStrategy::Store, &[10]),
        ])
        .await;
        let aggregator = ReportAggregator::new(recorder);

        let ranked = aggregator.aggregate().await.unwrap();
        let order: Vec<FetchStrategy> = ranked.iter().map(|s| s.strategy).collect();
        assert_eq!(order, FetchStrategy::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_empty_history_yields_zeroed_stats() {
        let recorder = TimingRecorder::new(InMemoryBackend::new());
        let aggregator = ReportAggregator::new(recorder);

        let stats = aggregator.aggregate().await.unwrap();
        assert_eq!(stats.len(), 3);
        for s in stats {
            assert_eq!(s.samples, 0);
            assert_eq!(s.avg_ms, 0.0);
        }
    }

    #[tokio::test]
    async fn test_report_carries_all_histories() {
        let recorder = recorder_with(&[
            (FetchStrategy::Store, &[1u64][..]),
            (FetchStrategy::Hybrid, &[2, 3]),
        ])
        .await;
        let aggregator = ReportAggregator::new(recorder);

        let report = aggregator.report().await.unwrap();
        assert_eq!(report.store.len(), 1);
        assert_eq!(report.cache.len(), 0);
        assert_eq!(report.hybrid.len(), 2);
    }
}
