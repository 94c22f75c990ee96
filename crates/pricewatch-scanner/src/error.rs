use pricewatch_core::ConfigurationError;
use pricewatch_source::SourceError;
use thiserror::Error;

/// Errors that stop a scan before any source is contacted.
///
/// Source failures during a scan never surface here; they are reported
/// per source in the result set.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
