//! `PriceWatch` Scanner - price search orchestration and relevance matching.
//!
//! This crate runs one product query across many retailer adapters and
//! reduces everything they return to a single price-sorted list of
//! listings that really are the product asked for.
//!
//! # Features
//!
//! - Concurrent searching of multiple sources with configurable parallelism
//! - Per-source timeouts; a failing or panicking source only loses its own listings
//! - Caller cancellation and scan deadlines that keep already-finished sources
//! - Token-set fuzzy matching with a strict relevance threshold
//! - Include/exclude word rules with ALL or ANY inclusion
//!
//! # Example
//!
//! ```rust,ignore
//! use pricewatch_scanner::{FilterQuery, ScanOrchestrator};
//! use pricewatch_core::MatchMode;
//!
//! let orchestrator = ScanOrchestrator::new(adapters).with_max_concurrent_sources(4);
//! let query = FilterQuery::new("smart tv 55", ["suporte"], ["4k"], MatchMode::All)?;
//!
//! let result = orchestrator.scan(&query).await;
//! for record in result.records() {
//!     println!("{} | {} | {}", record.description(), record.price(), record.source_name());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
#[allow(missing_docs)]
pub mod filter;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod result;
pub mod similarity;

// Re-export commonly used types
pub use error::{Result, ScanError};
pub use filter::{FilterQuery, RelevanceFilter, RELEVANCE_THRESHOLD};
pub use orchestrator::ScanOrchestrator;
pub use result::{ResultSet, SourceReport, SourceStatus};
pub use similarity::token_set_ratio;
