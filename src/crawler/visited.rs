//! Visited-set deduplication
//!
//! Holds every URL ever admitted to the frontier. The set only grows during
//! a crawl, and `insert` reports whether the URL was new in one atomic step,
//! so two workers racing on the same link cannot both admit it.

use crate::url::defragment;
use dashmap::DashSet;
use url::Url;

/// Set of URLs admitted to the frontier, shared by every worker
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<Url>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL, returning true if it was not already present
    ///
    /// The fragment is ignored: `/a#x` and `/a` are the same entry.
    pub fn insert(&self, url: &Url) -> bool {
        self.urls.insert(defragment(url.clone()))
    }

    /// Number of distinct URLs admitted
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns the admitted URLs as sorted strings
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.iter().map(|url| url.to_string()).collect();
        urls.sort();
        urls
    }
}
