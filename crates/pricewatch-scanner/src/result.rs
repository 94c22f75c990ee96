//! Scan outcome: relevant records plus what happened at each source.

use chrono::{DateTime, Utc};
use pricewatch_core::NormalizedRecord;
use serde::{Deserialize, Serialize};

/// How one source's part of the scan ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    /// Search and extraction finished; `records` normalized listings came back
    Completed {
        /// Listings contributed before filtering
        records: usize,
    },
    /// The adapter failed; the source contributed nothing
    Failed {
        /// Rendered adapter error
        error: String,
    },
    /// The scan was cancelled or timed out before this source finished
    Cancelled,
}

/// Per-source entry of a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    /// Retailer name
    pub source_name: String,
    /// Outcome
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    /// Whether the source produced a usable answer, even an empty one.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self.status, SourceStatus::Completed { .. })
    }
}

/// Relevant records sorted by price, with per-source diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<NormalizedRecord>,
    sources: Vec<SourceReport>,
    candidates: usize,
    scanned_at: DateTime<Utc>,
}

impl ResultSet {
    /// Assemble a result set; `records` must already be filtered.
    ///
    /// Records are sorted by price, ties keeping their given order.
    #[must_use]
    pub fn new(
        mut records: Vec<NormalizedRecord>,
        sources: Vec<SourceReport>,
        candidates: usize,
    ) -> Self {
        // sort_by_key is stable
        records.sort_by_key(NormalizedRecord::price);

        Self {
            records,
            sources,
            candidates,
            scanned_at: Utc::now(),
        }
    }

    /// Relevant records, cheapest first.
    #[must_use]
    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<NormalizedRecord> {
        self.records
    }

    /// One report per adapter, in adapter order.
    #[must_use]
    pub fn sources(&self) -> &[SourceReport] {
        &self.sources
    }

    /// Records considered before relevance filtering.
    #[must_use]
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    #[must_use]
    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when there were sources and none of them answered.
    ///
    /// Separates "every source failed" from "nothing relevant was found";
    /// both leave the record list empty.
    #[must_use]
    pub fn all_sources_failed(&self) -> bool {
        !self.sources.is_empty() && !self.sources.iter().any(SourceReport::succeeded)
    }

    /// Sources that failed or were cancelled.
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|report| !report.succeeded())
    }
}
