//! `PriceWatch` Source - retailer definitions and the adapters that scrape them.
//!
//! Each retailer is described by a TOML file: where to search, how the
//! search is triggered, and which CSS selectors pick listings off the
//! results page. A [`SelectorAdapter`] turns one definition plus one
//! browsing session into a [`SourceAdapter`] the scanner can run.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed retailer metadata and selectors
//! - **Loader** ([`loader`]): Finds and parses the TOML files under `source-definitions/`
//! - **Registry** ([`registry`]): Lookup and selection, ordered by source ID
//! - **Adapter** ([`adapter`]): The search/extract contract and record normalization
//! - **Selector Adapter** ([`selector`]): Definition-driven adapter over a browser session
//! - **Errors** ([`error`]): Source and adapter error types
//!
//! # Example
//!
//! ```rust,no_run
//! use pricewatch_source::{SourceLoader, SourceRegistry};
//! use pricewatch_core::SourceId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = SourceLoader::with_default_dir()?;
//! let registry = SourceRegistry::load_from(&loader)?;
//!
//! let definition = registry.get(&SourceId::new("kabum")?)?;
//! println!("Source: {} ({})", definition.name(), definition.source.locale);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod adapter;
pub mod definition;
pub mod error;
pub mod loader;
pub mod parser;
pub mod registry;
pub mod selector;
pub mod url_builder;

// Re-export commonly used types
pub use adapter::{normalize_records, SourceAdapter};
pub use definition::{ListingSelectors, SearchMethod, SourceDefinition, SourceMetadata};
pub use error::{AdapterError, Result, SourceError};
pub use loader::SourceLoader;
pub use parser::ListingParser;
pub use registry::SourceRegistry;
pub use selector::SelectorAdapter;
pub use url_builder::build_search_url;
