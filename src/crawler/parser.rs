//! Link extraction from fetched pages
//!
//! Links are found by scanning the body text for quoted `href` attribute
//! values rather than by building a document tree. Malformed markup simply
//! yields fewer (or odd) links; scanning never fails.
//!
//! Extraction does no host or visited filtering. Callers apply the host
//! policy and the visited set.

use crate::url::resolve;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Media types whose bodies are scanned for links
pub const EXTRACTABLE_MEDIA_TYPES: [&str; 2] = ["text/html", "application/xml"];

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']([^\s"'<>]+)"#).expect("href pattern is a valid regex")
});

/// Returns the media type of a Content-Type value without its parameters
///
/// # Examples
///
/// ```
/// use ripple_crawl::crawler::media_type;
///
/// assert_eq!(media_type("Text/HTML; charset=utf-8"), "text/html");
/// ```
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Returns true if a page with this Content-Type should be scanned for links
pub fn is_extractable(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| EXTRACTABLE_MEDIA_TYPES.contains(&media_type(value).as_str()))
        .unwrap_or(false)
}

/// Returns the raw `href` values in document order, duplicates included
pub fn scan_hrefs(body: &str) -> Vec<&str> {
    HREF.captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .map(|value| value.as_str())
        .collect()
}

/// Extracts the absolute, defragmented URLs a page references
///
/// Returns an empty set unless the Content-Type is `text/html` or
/// `application/xml`. Each reference is resolved against `page_url`, its
/// fragment is removed, and equal results collapse into one entry.
///
/// # Arguments
///
/// * `page_url` - The URL the body was fetched from
/// * `content_type` - The response's Content-Type header, if any
/// * `body` - The response body
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_links;
/// use url::Url;
///
/// let page = Url::parse("http://example.com/").unwrap();
/// let body = r#"<a href="/about">About</a> <a HREF='http://example.com/about#team'>Team</a>"#;
/// let links = extract_links(&page, Some("text/html"), body);
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_links(page_url: &Url, content_type: Option<&str>, body: &str) -> BTreeSet<Url> {
    if !is_extractable(content_type) {
        return BTreeSet::new();
    }

    scan_hrefs(body)
        .into_iter()
        .filter_map(|reference| resolve(page_url, reference))
        .collect()
}
