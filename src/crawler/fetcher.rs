//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with redirects disabled
//! - Sending one GET per frontier item
//! - Classifying responses into redirects, pages, and everything else
//!
//! Redirects are never followed by the client. Each hop comes back to the
//! worker as its own response so it is recorded and policy-checked.

use crate::config::HttpConfig;
use crate::crawler::parser::{extract_links, is_extractable};
use crate::url::resolve;
use crate::RippleError;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// Status codes treated as redirects
pub const REDIRECT_STATUSES: [u16; 5] = [300, 301, 302, 303, 307];

/// What a single response means for the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// Redirect to the resolved, defragmented `Location` target
    Redirect(Url),

    /// Redirect status whose `Location` is missing or cannot be resolved
    BadRedirect(String),

    /// Successful page; the links it references (unfiltered)
    Page(BTreeSet<Url>),

    /// Any other status, or a 200 with a content type that is not scanned
    Skipped,

    /// The body of a page could not be read
    Error(String),
}

/// Result of one fetch that received an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// HTTP status code
    pub status: u16,

    /// What the response means for the crawl
    pub kind: FetchKind,
}

/// Returns true if the status code is one the crawler follows as a redirect
pub fn is_redirect(status: StatusCode) -> bool {
    REDIRECT_STATUSES.contains(&status.as_u16())
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP transport configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::config::HttpConfig;
/// use ripple_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.effective_connect_timeout_secs()))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Thin wrapper over the HTTP client used by every worker
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Builds a fetcher with a freshly configured client
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Sends a GET request and waits for the response headers
    ///
    /// Connection failures, timeouts, and protocol errors come back as
    /// `RippleError::Http`.
    pub async fn send(&self, url: &Url) -> Result<Response, RippleError> {
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| RippleError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Classifies a response and consumes its body
    ///
    /// | Response | Outcome |
    /// |----------|---------|
    /// | 300/301/302/303/307 with `Location` | `Redirect(target)` |
    /// | redirect without usable `Location` | `BadRedirect` |
    /// | 200 with `text/html` or `application/xml` | `Page(links)` |
    /// | 200 whose body cannot be read | `Error` |
    /// | anything else | `Skipped` |
    pub async fn classify(&self, url: &Url, response: Response) -> FetchOutcome {
        let status = response.status();

        let kind = if is_redirect(status) {
            redirect_target(url, &response)
        } else if status == StatusCode::OK {
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            if is_extractable(content_type.as_deref()) {
                match response.text().await {
                    Ok(body) => FetchKind::Page(extract_links(url, content_type.as_deref(), &body)),
                    Err(e) => FetchKind::Error(format!("failed to read body: {}", e)),
                }
            } else {
                FetchKind::Skipped
            }
        } else {
            FetchKind::Skipped
        };

        FetchOutcome {
            status: status.as_u16(),
            kind,
        }
    }
}

/// Resolves the `Location` header of a redirect against the requested URL
fn redirect_target(url: &Url, response: &Response) -> FetchKind {
    let location = match response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(location) => location,
        None => return FetchKind::BadRedirect("redirect without Location header".to_string()),
    };

    match resolve(url, location) {
        Some(target) => FetchKind::Redirect(target),
        None => FetchKind::BadRedirect(format!("unusable redirect Location {:?}", location)),
    }
}
