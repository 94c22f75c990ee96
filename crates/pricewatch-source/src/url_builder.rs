use crate::definition::QUERY_PLACEHOLDER;
use url::form_urlencoded;

/// Substitute the percent-encoded query into a URL template.
///
/// Spaces become `+`, matching how retailer search forms submit.
#[must_use]
pub fn build_search_url(template: &str, query: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
    template.replace(QUERY_PLACEHOLDER, &encoded)
}
