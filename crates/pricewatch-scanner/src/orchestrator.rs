//! Scan orchestrator for running every source and merging their listings.
//!
//! This module provides the `ScanOrchestrator`, which fans a query out to
//! a set of adapters with bounded concurrency, treats any adapter failure
//! as "no records from that source", and filters and sorts the merged
//! listings once every source has answered or the scan was cut short.

use crate::error::Result;
use crate::filter::{FilterQuery, RelevanceFilter};
use crate::result::{ResultSet, SourceReport, SourceStatus};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use pricewatch_core::{MatchMode, NormalizedRecord, ScanningConfig};
use pricewatch_source::{AdapterError, SourceAdapter};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default number of sources searched at the same time.
const DEFAULT_MAX_CONCURRENT_SOURCES: usize = 4;

/// Default time one source gets for search plus extraction.
const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(60);

type SourceOutcome = std::result::Result<Vec<NormalizedRecord>, AdapterError>;

/// Runs a query across an ordered list of source adapters.
pub struct ScanOrchestrator {
    /// Adapters in reporting order
    adapters: Vec<Arc<dyn SourceAdapter>>,
    /// Maximum sources in flight
    max_concurrent_sources: usize,
    /// Limit for a single source
    source_timeout: Duration,
    /// Limit for the whole scan
    scan_timeout: Option<Duration>,
}

impl ScanOrchestrator {
    /// Create an orchestrator over `adapters`.
    ///
    /// Output never depends on completion order; ties in price keep adapter
    /// order, then each adapter's own order.
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            adapters,
            max_concurrent_sources: DEFAULT_MAX_CONCURRENT_SOURCES,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            scan_timeout: None,
        }
    }

    /// Create an orchestrator using the `[scanning]` settings.
    #[must_use]
    pub fn with_config(adapters: Vec<Arc<dyn SourceAdapter>>, config: &ScanningConfig) -> Self {
        Self::new(adapters)
            .with_max_concurrent_sources(config.concurrent_sources)
            .with_source_timeout(config.source_timeout())
            .with_scan_timeout(config.scan_timeout())
    }

    /// Set the maximum number of sources searched concurrently.
    #[must_use]
    pub fn with_max_concurrent_sources(mut self, max: usize) -> Self {
        self.max_concurrent_sources = max.max(1);
        self
    }

    /// Set how long one source may take.
    #[must_use]
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Set an overall deadline; `None` means wait for every source.
    #[must_use]
    pub fn with_scan_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.scan_timeout = timeout;
        self
    }

    /// Number of adapters this orchestrator runs.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.adapters.len()
    }

    /// Validate the query terms, then scan.
    ///
    /// # Errors
    /// Only configuration errors (blank product, bad terms). Source failures
    /// are reported inside the result set.
    pub async fn scan_terms(
        &self,
        target: &str,
        exclude_terms: &[String],
        include_terms: &[String],
        match_mode: MatchMode,
    ) -> Result<ResultSet> {
        let query = FilterQuery::new(target, exclude_terms, include_terms, match_mode)?;
        Ok(self.scan(&query).await)
    }

    /// Scan every source and return the relevant listings.
    pub async fn scan(&self, query: &FilterQuery) -> ResultSet {
        self.scan_with_cancel(query, CancellationToken::new()).await
    }

    /// Scan until done, cancelled, or past the scan deadline.
    ///
    /// Cancelling abandons sources still in flight; listings from sources
    /// that already finished are kept and filtered as usual.
    pub async fn scan_with_cancel(
        &self,
        query: &FilterQuery,
        cancel: CancellationToken,
    ) -> ResultSet {
        let total = self.adapters.len();
        let mut outcomes: Vec<Option<SourceOutcome>> = (0..total).map(|_| None).collect();

        tracing::info!(
            query = %query.target(),
            sources = total,
            max_concurrent = self.max_concurrent_sources,
            "starting scan"
        );

        let deadline = async {
            match self.scan_timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut pending = self.adapters.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();

        for (index, adapter) in pending.by_ref().take(self.max_concurrent_sources) {
            in_flight.push(run_source(
                index,
                Arc::clone(adapter),
                query.target().to_string(),
                self.source_timeout,
            ));
        }

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::warn!(unfinished = in_flight.len(), "scan cancelled");
                    break;
                }
                () = &mut deadline => {
                    tracing::warn!(unfinished = in_flight.len(), "scan deadline reached");
                    break;
                }
                next = in_flight.next() => {
                    let Some((index, outcome)) = next else {
                        break;
                    };
                    outcomes[index] = Some(outcome);

                    if let Some((index, adapter)) = pending.next() {
                        in_flight.push(run_source(
                            index,
                            Arc::clone(adapter),
                            query.target().to_string(),
                            self.source_timeout,
                        ));
                    }
                }
            }
        }

        // Dropping the set abandons whatever is still running.
        drop(in_flight);

        self.merge(query, outcomes)
    }

    /// Concatenate in adapter order, filter once, sort by price.
    fn merge(&self, query: &FilterQuery, outcomes: Vec<Option<SourceOutcome>>) -> ResultSet {
        let mut candidates = Vec::new();
        let mut reports = Vec::with_capacity(outcomes.len());

        for (adapter, outcome) in self.adapters.iter().zip(outcomes) {
            let source_name = adapter.source_name().to_string();
            let status = match outcome {
                Some(Ok(records)) => {
                    let count = records.len();
                    candidates.extend(records);
                    SourceStatus::Completed { records: count }
                }
                Some(Err(e)) => SourceStatus::Failed {
                    error: e.to_string(),
                },
                None => SourceStatus::Cancelled,
            };
            reports.push(SourceReport {
                source_name,
                status,
            });
        }

        let candidate_count = candidates.len();
        let relevant = RelevanceFilter::filter(query, candidates);
        let result = ResultSet::new(relevant, reports, candidate_count);

        if result.all_sources_failed() {
            tracing::warn!(
                sources = result.sources().len(),
                "every source failed; no listings collected"
            );
        } else if result.is_empty() {
            tracing::info!(
                candidates = candidate_count,
                "no relevant listings found"
            );
        } else {
            tracing::info!(
                candidates = candidate_count,
                relevant = result.len(),
                failed_sources = result.failed_sources().count(),
                "scan complete"
            );
        }

        result
    }
}

/// Run one adapter with its own timeout, turning panics into errors.
async fn run_source(
    index: usize,
    adapter: Arc<dyn SourceAdapter>,
    query: String,
    timeout: Duration,
) -> (usize, SourceOutcome) {
    let source_name = adapter.source_name().to_string();
    let work = AssertUnwindSafe(adapter.collect(&query)).catch_unwind();

    let outcome = match tokio::time::timeout(timeout, work).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(AdapterError::Panicked {
            source_name: source_name.clone(),
        }),
        Err(_) => Err(AdapterError::Timeout {
            source_name: source_name.clone(),
            after: timeout,
        }),
    };

    match &outcome {
        Ok(records) => {
            tracing::info!(source = %source_name, records = records.len(), "source completed");
        }
        Err(e) => {
            tracing::warn!(source = %source_name, error = %e, "source failed");
        }
    }

    (index, outcome)
}
