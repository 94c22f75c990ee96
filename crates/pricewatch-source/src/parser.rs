use crate::definition::ListingSelectors;
use crate::error::AdapterError;
use pricewatch_core::RawRecord;
use scraper::{ElementRef, Html, Selector};

/// Compiled listing selectors for one source.
pub struct ListingParser {
    source_name: String,
    container: Selector,
    item: Selector,
    description: Selector,
    price: Selector,
    seller: Option<Selector>,
    no_results: Option<Selector>,
}

impl ListingParser {
    /// Compile the listing selectors of one source.
    pub fn new(
        selectors: &ListingSelectors,
        source_name: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        let source_name = source_name.into();
        let compile = |field: &str, css: &str| {
            Selector::parse(css).map_err(|e| AdapterError::SelectorsOutdated {
                source_name: source_name.clone(),
                reason: format!("invalid {field} selector: {e}"),
            })
        };

        Ok(Self {
            container: compile("container", &selectors.container)?,
            item: compile("item", &selectors.item)?,
            description: compile("description", &selectors.description)?,
            price: compile("price", &selectors.price)?,
            seller: selectors
                .seller
                .as_deref()
                .map(|css| compile("seller", css))
                .transpose()?,
            no_results: selectors
                .no_results
                .as_deref()
                .map(|css| compile("no_results", css))
                .transpose()?,
            source_name,
        })
    }

    /// Extract raw listings from a results page.
    ///
    /// Listings without a description or price are skipped. A page showing
    /// the no-results marker yields no listings.
    pub fn parse(&self, html: &str) -> Result<Vec<RawRecord>, AdapterError> {
        let document = Html::parse_document(html);

        if let Some(no_results) = &self.no_results {
            if document.select(no_results).next().is_some() {
                tracing::debug!(source = %self.source_name, "no-results marker present");
                return Ok(vec![]);
            }
        }

        let container = document.select(&self.container).next().ok_or_else(|| {
            AdapterError::SelectorsOutdated {
                source_name: self.source_name.clone(),
                reason: "results container not found".to_string(),
            }
        })?;

        let mut records = Vec::new();
        let mut skipped = 0usize;

        for item in container.select(&self.item) {
            match self.parse_item(&item) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(
                source = %self.source_name,
                skipped,
                "skipped listings missing description or price"
            );
        }

        Ok(records)
    }

    fn parse_item(&self, element: &ElementRef) -> Option<RawRecord> {
        let description = element
            .select(&self.description)
            .next()
            .map(|el| collapsed_text(&el))
            .filter(|text| !text.is_empty())?;

        // Price fragments keep their line breaks so a source's replacement
        // rule can target them.
        let price = element
            .select(&self.price)
            .next()
            .map(|el| price_text(&el))
            .filter(|text| !text.is_empty())?;

        let record = RawRecord::new(description, price);

        let seller = self.seller.as_ref().and_then(|selector| {
            element
                .select(selector)
                .next()
                .map(|el| collapsed_text(&el))
                .filter(|text| !text.is_empty())
        });

        Some(match seller {
            Some(seller) => record.with_source_name(seller),
            None => record,
        })
    }
}

/// Element text with all whitespace runs collapsed to single spaces.
fn collapsed_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed, non-empty text nodes of an element, one per line.
fn price_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
