//! Core error types for PriceWatch.
//!
//! Normalization and configuration failures live here because every other
//! crate in the workspace produces or inspects them.

use thiserror::Error;

/// Central error type for PriceWatch operations that are not tied to a
/// single subsystem.
#[derive(Error, Debug)]
pub enum PriceWatchError {
    /// Configuration errors (file loading, parsing, query validation)
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Price text could not be turned into a decimal
    #[error("normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    /// Validation errors (invalid identifiers, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
///
/// These are the only errors that abort a scan before it starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Locale tag that has no known separator convention
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    /// The product query is blank
    #[error("product query cannot be empty")]
    EmptyQuery,

    /// An include/exclude term that can never match a description token
    #[error("invalid filter term '{term}': {reason}")]
    InvalidTerm {
        /// The offending term as supplied
        term: String,
        /// Reason for rejection
        reason: String,
    },
}

/// Price text that could not be parsed under a locale.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    /// Nothing numeric left after stripping
    #[error("no digits in price text '{text}'")]
    NoDigits {
        /// Cleaned price text
        text: String,
    },

    /// Separators do not form a valid number for the locale
    #[error("'{text}' is not a valid {locale} number: {reason}")]
    Invalid {
        /// Cleaned price text
        text: String,
        /// Locale tag used for parsing
        locale: String,
        /// Parser message
        reason: String,
    },

    /// Prices are never negative
    #[error("negative price '{text}'")]
    Negative {
        /// Cleaned price text
        text: String,
    },
}

/// Result type alias using `PriceWatchError`.
pub type Result<T> = std::result::Result<T, PriceWatchError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
