//! Shared types used across PriceWatch.
//!
//! Records flow one way: an adapter produces [`RawRecord`]s, normalization
//! turns them into immutable [`NormalizedRecord`]s, and the scanner filters
//! and sorts those.

use crate::error::{NormalizationError, PriceWatchError};
use crate::locale::LocaleSpec;
use crate::price;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Newtype for source identifiers with validation.
///
/// Source IDs must be lowercase alphanumeric with hyphens, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Create a new `SourceId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, PriceWatchError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), PriceWatchError> {
        static SOURCE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = SOURCE_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if id.len() < 3 || id.len() > 50 {
            return Err(PriceWatchError::Validation(format!(
                "invalid source ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(PriceWatchError::Validation(format!(
                "invalid source ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl TryFrom<String> for SourceId {
    type Error = PriceWatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Literal substitution applied to price text before cleaning.
///
/// Some retailers render the cents on their own line, so `"1.299\n00"`
/// needs `"\n"` turned into `","` before it reads as a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReplacement {
    /// Substring to look for
    pub from: String,
    /// Replacement text
    pub to: String,
}

impl PriceReplacement {
    /// Create a replacement rule.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// How include terms combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every include term must appear
    #[default]
    All,
    /// At least one include term must appear
    Any,
}

impl FromStr for MatchMode {
    type Err = PriceWatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            other => Err(PriceWatchError::Validation(format!(
                "match mode must be 'all' or 'any', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Any => write!(f, "any"),
        }
    }
}

/// Price as an adapter found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPrice {
    /// Unparsed text in the source's own format
    Text(String),
    /// Already a decimal (structured feeds)
    Parsed(Decimal),
}

/// A listing as extracted from one source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Product description, free text
    pub description: String,
    /// Price text or value
    pub price: RawPrice,
    /// Retailer name, when the listing names one itself
    pub source_name: Option<String>,
}

impl RawRecord {
    /// Listing with unparsed price text.
    #[must_use]
    pub fn new(description: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            price: RawPrice::Text(price_text.into()),
            source_name: None,
        }
    }

    /// Listing whose price the adapter already parsed.
    #[must_use]
    pub fn with_parsed_price(description: impl Into<String>, price: Decimal) -> Self {
        Self {
            description: description.into(),
            price: RawPrice::Parsed(price),
            source_name: None,
        }
    }

    /// Attach the retailer named by the listing.
    #[must_use]
    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// Normalize into a [`NormalizedRecord`].
    ///
    /// `default_source` fills in the retailer when the listing does not
    /// name one.
    ///
    /// # Errors
    /// Returns the normalization failure for unparsable prices, or a
    /// validation error when no non-empty source name is available.
    pub fn normalize(
        self,
        default_source: &str,
        locale: &LocaleSpec,
        replacement: Option<&PriceReplacement>,
    ) -> Result<NormalizedRecord, PriceWatchError> {
        let price = match &self.price {
            RawPrice::Text(text) => price::normalize(text, locale, replacement)?,
            RawPrice::Parsed(value) if value.is_sign_negative() && !value.is_zero() => {
                return Err(NormalizationError::Negative {
                    text: value.to_string(),
                }
                .into());
            }
            RawPrice::Parsed(value) => *value,
        };

        let source_name = self
            .source_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_source.trim().to_string());

        NormalizedRecord::new(self.description, price, source_name)
    }
}

/// A listing with a canonical price, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    description: String,
    price: Decimal,
    source_name: String,
}

impl NormalizedRecord {
    /// Create a record.
    ///
    /// # Errors
    /// The price must be non-negative and the source name non-empty.
    pub fn new(
        description: impl Into<String>,
        price: Decimal,
        source_name: impl Into<String>,
    ) -> Result<Self, PriceWatchError> {
        let source_name = source_name.into();

        if source_name.trim().is_empty() {
            return Err(PriceWatchError::Validation(
                "source name cannot be empty".to_string(),
            ));
        }

        if price.is_sign_negative() && !price.is_zero() {
            return Err(PriceWatchError::Validation(format!(
                "price cannot be negative, got {price}"
            )));
        }

        Ok(Self {
            description: description.into(),
            price,
            source_name,
        })
    }

    /// Product description as listed.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Canonical price.
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Retailer the listing came from.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }
}
