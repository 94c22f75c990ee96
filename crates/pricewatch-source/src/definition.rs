//! Source definition types and structures.
//!
//! This module defines the data structures for retailer definitions loaded from TOML files.

use crate::error::{Result, SourceError};
use pricewatch_core::{LocaleSpec, PriceReplacement, SourceId};
use scraper::Selector;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the encoded query in URL templates.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Complete source definition loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Core retailer metadata
    pub source: SourceMetadata,

    /// How to run a search
    pub search: SearchMethod,

    /// Where the listings are on the results page
    pub listing: ListingSelectors,
}

impl SourceDefinition {
    /// Get the source ID.
    #[must_use]
    pub fn id(&self) -> &SourceId {
        &self.source.id
    }

    /// Get the retailer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.source.name
    }

    /// Validate the source definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.source.name.trim().is_empty() {
            return Err(self.invalid("source name cannot be empty"));
        }

        if !is_http_url(&self.source.url) {
            return Err(self.invalid(format!(
                "source URL must be http(s), got '{}'",
                self.source.url
            )));
        }

        if let Some(rule) = &self.source.price_replacement {
            if rule.from.is_empty() {
                return Err(self.invalid("price_replacement.from cannot be empty"));
            }
        }

        self.search.validate(&self.source.id)?;
        self.listing.validate(&self.source.id)?;

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> SourceError {
        SourceError::ValidationError {
            source_id: self.source.id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Core retailer metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Unique source identifier (e.g., "kabum", "amazon-br")
    pub id: SourceId,

    /// Retailer name shown on every record from this source
    pub name: String,

    /// Retailer home page
    pub url: String,

    /// Number format of this retailer's prices
    pub locale: LocaleSpec,

    /// Substitution applied to price text before parsing
    #[serde(default)]
    pub price_replacement: Option<PriceReplacement>,
}

/// Methods for searching a retailer site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum SearchMethod {
    /// Search page reachable by URL (e.g., `https://example.com/{query}/b`)
    UrlTemplate {
        /// URL template containing `{query}`
        template: String,
    },

    /// Type the query into the site's search box and press Enter
    SearchBox {
        /// Page holding the search box
        url: String,
        /// CSS selector of the search input
        input: String,
    },
}

impl SearchMethod {
    /// Validate search method configuration.
    pub fn validate(&self, source_id: &SourceId) -> Result<()> {
        match self {
            Self::UrlTemplate { template } => {
                if !template.contains(QUERY_PLACEHOLDER) {
                    return Err(SourceError::ValidationError {
                        source_id: source_id.to_string(),
                        reason: format!("URL template must contain {QUERY_PLACEHOLDER}"),
                    });
                }
                if !is_http_url(template) {
                    return Err(SourceError::ValidationError {
                        source_id: source_id.to_string(),
                        reason: "URL template must be http(s)".to_string(),
                    });
                }
            }
            Self::SearchBox { url, input } => {
                if !is_http_url(url) {
                    return Err(SourceError::ValidationError {
                        source_id: source_id.to_string(),
                        reason: format!("search URL must be http(s), got '{url}'"),
                    });
                }
                check_selector(source_id, "search.input", input)?;
            }
        }
        Ok(())
    }
}

/// CSS selectors locating listings on a results page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Results grid; its presence means the page finished loading
    pub container: String,
    /// One listing inside the grid
    pub item: String,
    /// Product description within a listing
    pub description: String,
    /// Price text within a listing
    pub price: String,
    /// Seller name within a listing (aggregator sites)
    #[serde(default)]
    pub seller: Option<String>,
    /// Element shown when the search found nothing
    #[serde(default)]
    pub no_results: Option<String>,
}

impl ListingSelectors {
    /// Check every selector parses.
    pub fn validate(&self, source_id: &SourceId) -> Result<()> {
        check_selector(source_id, "listing.container", &self.container)?;
        check_selector(source_id, "listing.item", &self.item)?;
        check_selector(source_id, "listing.description", &self.description)?;
        check_selector(source_id, "listing.price", &self.price)?;
        if let Some(seller) = &self.seller {
            check_selector(source_id, "listing.seller", seller)?;
        }
        if let Some(no_results) = &self.no_results {
            check_selector(source_id, "listing.no_results", no_results)?;
        }
        Ok(())
    }
}

fn check_selector(source_id: &SourceId, field: &str, selector: &str) -> Result<()> {
    if selector.trim().is_empty() {
        return Err(SourceError::ValidationError {
            source_id: source_id.to_string(),
            reason: format!("{field} cannot be empty"),
        });
    }

    Selector::parse(selector).map_err(|e| SourceError::ValidationError {
        source_id: source_id.to_string(),
        reason: format!("{field} is not a valid CSS selector: {e}"),
    })?;

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
