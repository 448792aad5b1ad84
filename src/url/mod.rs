//! URL handling module for Ripple-Crawl
//!
//! This module provides seed normalization, defragmentation, host extraction,
//! and the host policy that keeps a crawl on its target site.

mod host;
mod normalize;

use crate::UrlError;
use std::collections::HashSet;
use url::Url;

// Re-export main functions
pub use host::{extract_host, is_ip_host, toggle_www};
pub use normalize::{defragment, normalize_seed, resolve};

/// Decides whether a candidate URL belongs to the crawl's target site
///
/// The set of accepted host spellings (the root site) is derived once from
/// the root URL and never changes afterwards, so a policy can be shared
/// between any number of workers without locking.
///
/// # Root site
///
/// - IP literal root (`127.0.0.1`): exactly that address.
/// - Named root (`example.com`): the lower-cased host and its `www.`-toggled
///   spelling (`www.example.com`).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::HostPolicy;
///
/// let root = Url::parse("http://www.example.com/").unwrap();
/// let policy = HostPolicy::new(&root).unwrap();
///
/// assert!(policy.allowed(&Url::parse("http://example.com/page").unwrap()));
/// assert!(policy.allowed(&Url::parse("https://WWW.EXAMPLE.COM/").unwrap()));
/// assert!(!policy.allowed(&Url::parse("http://evil.com/x").unwrap()));
/// assert!(!policy.allowed(&Url::parse("ftp://example.com/file").unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct HostPolicy {
    root_hosts: HashSet<String>,
}

impl HostPolicy {
    /// Builds the policy from the crawl's root URL
    ///
    /// # Returns
    ///
    /// * `Ok(HostPolicy)` - Policy scoped to the root URL's site
    /// * `Err(UrlError::MissingHost)` - The root URL has no host
    pub fn new(root: &Url) -> Result<Self, UrlError> {
        let host = extract_host(root).ok_or(UrlError::MissingHost)?;

        let mut root_hosts = HashSet::new();
        if !is_ip_host(root) {
            root_hosts.insert(toggle_www(&host));
        }
        root_hosts.insert(host);

        Ok(Self { root_hosts })
    }

    /// Returns the accepted host spellings, sorted
    pub fn root_hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.root_hosts.iter().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }

    /// Returns true if the URL is in scope for this crawl
    ///
    /// Rejects non-HTTP(S) schemes, URLs without a host, and IP literal hosts
    /// that are not part of the root site. Named hosts are accepted when they
    /// are in the root site directly or through their `www.`-toggled spelling.
    pub fn allowed(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            tracing::debug!("skipping non-http scheme in {}", url);
            return false;
        }

        let host = match extract_host(url) {
            Some(host) => host,
            None => {
                tracing::debug!("skipping host-less url {}", url);
                return false;
            }
        };

        if !self.host_allowed(&host, is_ip_host(url)) {
            tracing::debug!("skipping non-root host in {}", url);
            return false;
        }

        true
    }

    fn host_allowed(&self, host: &str, is_ip: bool) -> bool {
        if self.root_hosts.contains(host) {
            return true;
        }
        if is_ip {
            return false;
        }
        self.root_hosts.contains(&toggle_www(host))
    }
}
