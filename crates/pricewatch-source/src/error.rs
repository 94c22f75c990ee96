//! Error types for the source subsystem.

use pricewatch_browser::BrowserError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading or looking up source definitions.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Source definition not found
    #[error("source definition not found: {source_id}")]
    NotFound {
        /// The source ID that was not found
        source_id: String,
    },

    /// Failed to load source definition from file
    #[error("failed to load source definition from {path}: {source}")]
    LoadError {
        /// Path to the definition file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse source definition TOML
    #[error("failed to parse source definition TOML in {path}: {source}")]
    ParseError {
        /// Path to the definition file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Invalid source definition (validation failed)
    #[error("invalid source definition for {source_id}: {reason}")]
    ValidationError {
        /// Source ID being validated
        source_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Source definition directory not found
    #[error("source definitions directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while accessing source definitions
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid source ID format
    #[error("invalid source ID: {0}")]
    InvalidId(#[from] pricewatch_core::PriceWatchError),
}

/// Failure of one adapter while searching or extracting.
///
/// The scanner turns any of these into "zero records from this source".
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Browser session failure (navigation, missing element, wait timeout)
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    /// The adapter did not finish in time
    #[error("{source_name} did not respond within {after:?}")]
    Timeout {
        /// Source that timed out
        source_name: String,
        /// Time limit that was exceeded
        after: Duration,
    },

    /// Page markup no longer matches the configured selectors
    #[error("selectors outdated for {source_name}: {reason}")]
    SelectorsOutdated {
        /// Source whose markup changed
        source_name: String,
        /// What was missing
        reason: String,
    },

    /// The adapter panicked
    #[error("{source_name} adapter panicked")]
    Panicked {
        /// Source whose adapter panicked
        source_name: String,
    },
}

/// Result type for source definition operations.
pub type Result<T> = std::result::Result<T, SourceError>;
