//! Selector-driven adapter built from a [`SourceDefinition`].

use crate::adapter::SourceAdapter;
use crate::definition::{SearchMethod, SourceDefinition};
use crate::error::{AdapterError, Result, SourceError};
use crate::parser::ListingParser;
use crate::url_builder::build_search_url;
use pricewatch_browser::{BrowserError, PageActions};
use pricewatch_core::{LocaleSpec, PriceReplacement, RawRecord};
use std::time::Duration;
use tracing::{debug, info};

/// Adapter that drives one browsing session using the CSS selectors of a
/// source definition.
pub struct SelectorAdapter<P: PageActions> {
    definition: SourceDefinition,
    parser: ListingParser,
    session: P,
    wait_timeout: Duration,
}

impl<P: PageActions> SelectorAdapter<P> {
    /// Build an adapter over `session`.
    ///
    /// `wait_timeout` bounds how long the results grid may take to appear.
    pub fn new(definition: SourceDefinition, session: P, wait_timeout: Duration) -> Result<Self> {
        definition.validate()?;

        let parser = ListingParser::new(&definition.listing, definition.name()).map_err(|e| {
            SourceError::ValidationError {
                source_id: definition.id().to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            definition,
            parser,
            session,
            wait_timeout,
        })
    }

    /// The definition this adapter was built from.
    #[must_use]
    pub fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    async fn shows_no_results(&self) -> std::result::Result<bool, AdapterError> {
        match &self.definition.listing.no_results {
            Some(marker) => Ok(self.session.element_exists(marker).await?),
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl<P: PageActions> SourceAdapter for SelectorAdapter<P> {
    fn source_name(&self) -> &str {
        self.definition.name()
    }

    fn locale(&self) -> &LocaleSpec {
        &self.definition.source.locale
    }

    fn price_replacement(&self) -> Option<&PriceReplacement> {
        self.definition.source.price_replacement.as_ref()
    }

    async fn search(&self, query: &str) -> std::result::Result<(), AdapterError> {
        match &self.definition.search {
            SearchMethod::UrlTemplate { template } => {
                let url = build_search_url(template, query);
                debug!(source = %self.source_name(), url = %url, "opening search page");
                self.session.navigate(&url).await?;
            }
            SearchMethod::SearchBox { url, input } => {
                debug!(source = %self.source_name(), url = %url, "typing into search box");
                self.session.navigate(url).await?;
                self.session
                    .wait_for_selector(input, self.wait_timeout)
                    .await?;
                self.session.fill_field(input, query).await?;
                self.session.submit_field(input).await?;
            }
        }
        Ok(())
    }

    async fn extract(&self) -> std::result::Result<Vec<RawRecord>, AdapterError> {
        if self.shows_no_results().await? {
            info!(source = %self.source_name(), "no results");
            return Ok(vec![]);
        }

        let container = &self.definition.listing.container;
        if let Err(e) = self
            .session
            .wait_for_selector(container, self.wait_timeout)
            .await
        {
            if !matches!(e, BrowserError::Timeout { .. }) {
                return Err(e.into());
            }
            // The marker may render after the grid wait started.
            if self.shows_no_results().await? {
                info!(source = %self.source_name(), "no results");
                return Ok(vec![]);
            }
            return Err(AdapterError::SelectorsOutdated {
                source_name: self.source_name().to_string(),
                reason: format!("results container '{container}' never appeared"),
            });
        }

        let html = self.session.content().await?;
        let records = self.parser.parse(&html)?;

        info!(
            source = %self.source_name(),
            count = records.len(),
            "extracted listings"
        );

        Ok(records)
    }
}
