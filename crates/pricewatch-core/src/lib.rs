//! PriceWatch Core - Foundation crate for the PriceWatch price aggregator.
//!
//! This crate provides the record types, price normalization, error handling
//! and configuration management that all other PriceWatch crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`locale`] - Decimal/grouping separator conventions
//! - [`price`] - Locale-aware price text normalization
//! - [`types`] - Shared newtypes and records (`SourceId`, `RawRecord`, `NormalizedRecord`)
//!
//! # Example
//!
//! ```rust
//! use pricewatch_core::{price, LocaleSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let locale = LocaleSpec::from_tag("pt_BR")?;
//! let value = price::normalize("R$ 1.299,90", &locale, None)?;
//! assert_eq!(value.to_string(), "1299.90");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod locale;
pub mod price;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, ScanningConfig, SourcesConfig};
pub use error::{ConfigResult, ConfigurationError, NormalizationError, PriceWatchError, Result};
pub use locale::LocaleSpec;
pub use rust_decimal::Decimal;
pub use types::{MatchMode, NormalizedRecord, PriceReplacement, RawPrice, RawRecord, SourceId};
