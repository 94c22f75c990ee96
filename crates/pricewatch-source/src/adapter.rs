//! The adapter contract every retailer implements.

use crate::error::AdapterError;
use pricewatch_core::{LocaleSpec, NormalizedRecord, PriceReplacement, RawRecord};
use tracing::debug;

/// One retailer's way of turning a query into listings.
///
/// An adapter owns its browsing session exclusively, so `search` followed
/// by `extract` always reads the page that search produced.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Retailer name attached to records that don't name their own seller.
    fn source_name(&self) -> &str;

    /// Number format of this retailer's prices.
    fn locale(&self) -> &LocaleSpec;

    /// Substitution applied to price text before parsing.
    fn price_replacement(&self) -> Option<&PriceReplacement> {
        None
    }

    /// Run the search for `query` and leave the results page loaded.
    async fn search(&self, query: &str) -> Result<(), AdapterError>;

    /// Read listings off the current results page.
    ///
    /// "No results" is `Ok(vec![])`, not an error.
    async fn extract(&self) -> Result<Vec<RawRecord>, AdapterError>;

    /// Search, extract and normalize in one go.
    async fn collect(&self, query: &str) -> Result<Vec<NormalizedRecord>, AdapterError> {
        self.search(query).await?;
        let raw = self.extract().await?;
        Ok(normalize_records(
            self.source_name(),
            self.locale(),
            self.price_replacement(),
            raw,
        ))
    }
}

/// Normalize raw listings, dropping any that fail.
///
/// A bad price on one listing never costs the rest of the source.
pub fn normalize_records(
    source_name: &str,
    locale: &LocaleSpec,
    replacement: Option<&PriceReplacement>,
    raw: Vec<RawRecord>,
) -> Vec<NormalizedRecord> {
    let total = raw.len();
    let records: Vec<NormalizedRecord> = raw
        .into_iter()
        .filter_map(|record| {
            let description = record.description.clone();
            match record.normalize(source_name, locale, replacement) {
                Ok(normalized) => Some(normalized),
                Err(e) => {
                    debug!(
                        source = %source_name,
                        description = %description,
                        error = %e,
                        "dropping listing"
                    );
                    None
                }
            }
        })
        .collect();

    if records.len() < total {
        debug!(
            source = %source_name,
            kept = records.len(),
            dropped = total - records.len(),
            "normalized listings"
        );
    }

    records
}
