//! Browser sessions for JavaScript-heavy retailer sites.
//!
//! A [`BrowserEngine`] owns one headless Chromium; every source adapter
//! gets its own [`BrowserSession`] tab and drives it through [`PageActions`].

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;

pub use actions::PageActions;
pub use engine::{BrowserEngine, BrowserSession};
pub use error::{BrowserError, Result};
