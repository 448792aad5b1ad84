//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns one crawl from root URL to statistics:
//! - Normalizing the root and deriving the host policy
//! - Seeding the frontier and starting the worker pool
//! - Waiting for the frontier to drain or for an interrupt
//! - Stopping the workers and finishing the sink

use crate::config::{validate, Config};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::worker::{FetchWorker, WorkerContext};
use crate::output::{CrawlStats, RecordSink};
use crate::url::{normalize_seed, HostPolicy};
use crate::RippleError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Runs crawls with a fixed configuration and record sink
pub struct CrawlCoordinator {
    config: Config,
    fetcher: Fetcher,
    sink: Arc<dyn RecordSink>,
    interrupt: CancellationToken,
}

impl CrawlCoordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration (validated here)
    /// * `sink` - Where one record per HTTP response is written
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlCoordinator)` - Ready to crawl
    /// * `Err(RippleError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config, sink: Arc<dyn RecordSink>) -> Result<Self, RippleError> {
        validate(&config)?;
        let fetcher = Fetcher::new(&config.http)?;

        Ok(Self {
            config,
            fetcher,
            sink,
            interrupt: CancellationToken::new(),
        })
    }

    /// Returns a token that stops the crawl when cancelled
    ///
    /// Cancelling it makes `crawl` stop handing out work, wait for in-flight
    /// fetches, and return statistics marked as interrupted. The token stays
    /// cancelled; later crawls on this coordinator end immediately.
    pub fn interrupt_handle(&self) -> CancellationToken {
        self.interrupt.clone()
    }

    /// Crawls the site reachable from `root`
    ///
    /// Returns once every admitted URL has been processed, or once the crawl
    /// is interrupted. Fetch failures never abort the crawl; only an unusable
    /// root URL does.
    pub async fn crawl(&self, root: &str) -> Result<CrawlStats, RippleError> {
        let root = normalize_seed(root)?;
        let policy = HostPolicy::new(&root)?;
        tracing::info!("Hosts: {}", policy.root_hosts().join(" "));

        let ctx = Arc::new(WorkerContext::new(
            policy,
            self.fetcher.clone(),
            self.sink.clone(),
        ));
        ctx.admit(root.clone());

        let started_at = Utc::now();
        let start = Instant::now();

        let worker_count = self.config.crawler.max_tasks;
        tracing::info!("Starting {} workers for {}", worker_count, root);

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            workers.spawn(FetchWorker::new(id, ctx.clone()).run());
        }

        let interrupted = tokio::select! {
            _ = ctx.frontier.await_drained() => false,
            _ = self.interrupt.cancelled() => true,
        };

        let elapsed = start.elapsed();
        let finished_at = Utc::now();

        if interrupted {
            tracing::warn!(
                "Crawl interrupted with {} urls outstanding",
                ctx.frontier.outstanding()
            );
        } else {
            tracing::info!("Frontier drained, stopping workers");
        }

        ctx.frontier.close();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(processed)) => tracing::trace!("worker exited after {} urls", processed),
                Ok(Err(e)) => tracing::error!("worker failed: {}", e),
                Err(e) => tracing::error!("worker task panicked or was cancelled: {}", e),
            }
        }

        if let Err(e) = self.sink.finish() {
            tracing::warn!("failed to finish output: {}", e);
        }

        let stats = CrawlStats {
            root: root.to_string(),
            started_at,
            finished_at,
            elapsed,
            urls_visited: ctx.visited.len() as u64,
            responses: ctx.counters.responses(),
            redirects: ctx.counters.redirects(),
            bad_redirects: ctx.counters.bad_redirects(),
            pages_parsed: ctx.counters.pages_parsed(),
            links_rejected: ctx.counters.links_rejected(),
            transport_errors: ctx.counters.transport_errors(),
            interrupted,
        };

        tracing::info!(
            "Crawl completed: {} urls, {} responses in {:?}",
            stats.urls_visited,
            stats.responses,
            stats.elapsed
        );

        Ok(stats)
    }
}
