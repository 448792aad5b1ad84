//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The frontier queue and its outstanding-work counter
//! - The visited set shared by all workers
//! - HTTP fetching and response classification
//! - Link extraction from fetched pages
//! - The worker pool and overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod visited;
mod worker;

pub use coordinator::CrawlCoordinator;
pub use fetcher::{build_http_client, is_redirect, FetchKind, FetchOutcome, Fetcher, REDIRECT_STATUSES};
pub use frontier::Frontier;
pub use parser::{extract_links, is_extractable, media_type, scan_hrefs, EXTRACTABLE_MEDIA_TYPES};
pub use visited::VisitedSet;
pub use worker::{FetchWorker, WorkerContext};

use crate::config::Config;
use crate::output::{CrawlStats, RecordSink};
use crate::RippleError;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Normalize the root URL and derive the accepted hosts
/// 3. Fetch every same-site page reachable from the root
/// 4. Write one record per response to `sink`
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `root` - The root URL; `http://` is assumed when no scheme is given
/// * `sink` - Where records are written
///
/// # Returns
///
/// * `Ok(CrawlStats)` - The crawl drained
/// * `Err(RippleError)` - Invalid configuration or root URL
pub async fn crawl(
    config: Config,
    root: &str,
    sink: Arc<dyn RecordSink>,
) -> Result<CrawlStats, RippleError> {
    CrawlCoordinator::new(config, sink)?.crawl(root).await
}
