use crate::error::{BrowserError, Result};
use std::time::Duration;

/// Page-level actions a source adapter needs from a browsing session.
///
/// One implementor instance is one exclusive session: a tab that an
/// adapter navigates, types into and reads back.
#[async_trait::async_trait]
pub trait PageActions: Send + Sync {
    /// Navigate to a URL
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Type a value into a form field by selector
    async fn fill_field(&self, selector: &str, value: &str) -> Result<()>;

    /// Press Enter in a field, submitting its form
    async fn submit_field(&self, selector: &str) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Whether any element currently matches a selector
    async fn element_exists(&self, selector: &str) -> Result<bool>;

    /// Current page HTML
    async fn content(&self) -> Result<String>;
}

/// Helper to extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("Invalid URL: {}", e)))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("No host in URL".to_string()))
        .map(|s| s.to_string())
}
