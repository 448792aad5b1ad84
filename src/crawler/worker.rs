//! Fetch workers
//!
//! A crawl runs a fixed pool of identical workers. Each one repeatedly takes
//! a URL from the frontier, fetches it, records the response, admits whatever
//! same-site URLs the response leads to, and then acknowledges the item. The
//! acknowledgement always comes last, whatever happened to the fetch, so the
//! frontier's outstanding counter stays exact.

use crate::crawler::fetcher::{FetchKind, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlCounters, CrawlRecord, RecordSink};
use crate::state::WorkerState;
use crate::url::{defragment, HostPolicy};
use crate::RippleError;
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// State shared by every worker of one crawl
pub struct WorkerContext {
    pub frontier: Frontier,
    pub visited: VisitedSet,
    pub policy: HostPolicy,
    pub fetcher: Fetcher,
    pub sink: Arc<dyn RecordSink>,
    pub counters: CrawlCounters,
}

impl WorkerContext {
    /// Creates a context with an empty frontier and visited set
    pub fn new(policy: HostPolicy, fetcher: Fetcher, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            policy,
            fetcher,
            sink,
            counters: CrawlCounters::new(),
        }
    }

    /// Enqueues a URL unless it has been admitted before
    ///
    /// The host policy is not consulted here; callers filter first. Returns
    /// true if the URL was new.
    pub fn admit(&self, url: Url) -> bool {
        let url = defragment(url);
        if !self.visited.insert(&url) {
            return false;
        }

        tracing::debug!("adding {}", url);
        self.frontier.enqueue(url);
        true
    }

    /// Filters a page's links through the host policy and admits the rest
    ///
    /// Returns the number of URLs newly enqueued.
    pub fn admit_links(&self, page_url: &Url, links: BTreeSet<Url>) -> usize {
        let total = links.len();
        let mut rejected = 0u64;
        let mut admitted = 0usize;

        for link in links {
            if !self.policy.allowed(&link) {
                rejected += 1;
                continue;
            }
            if self.admit(link) {
                admitted += 1;
            }
        }

        if rejected > 0 {
            self.counters.record_links_rejected(rejected);
        }
        tracing::info!(
            "got {} distinct urls from {} ({} new, {} off-site)",
            total,
            page_url,
            admitted,
            rejected
        );

        admitted
    }

    /// Hands a record to the sink
    ///
    /// Sink failures are logged and the crawl carries on.
    pub fn emit(&self, record: CrawlRecord) {
        self.counters.record_response();
        tracing::debug!("{}", record);

        if let Err(e) = self.sink.record(&record) {
            tracing::warn!("failed to record {}: {}", record.url, e);
        }
    }
}

/// One member of the crawl's worker pool
pub struct FetchWorker {
    id: usize,
    ctx: Arc<WorkerContext>,
    state: WorkerState,
    processed: u64,
}

impl FetchWorker {
    pub fn new(id: usize, ctx: Arc<WorkerContext>) -> Self {
        Self {
            id,
            ctx,
            state: WorkerState::Idle,
            processed: 0,
        }
    }

    fn transition(&mut self, next: WorkerState) -> Result<(), RippleError> {
        if !self.state.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::trace!("worker {}: {} -> {}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Processes frontier items until the frontier is closed
    ///
    /// A failure while processing one item is logged and the worker moves on
    /// to the next. Returns the number of items this worker acknowledged.
    pub async fn run(mut self) -> Result<u64, RippleError> {
        while let Some(url) = self.ctx.frontier.dequeue().await {
            if let Err(e) = self.process(&url).await {
                tracing::error!("worker {} failed on {}: {}", self.id, url, e);
                self.recover();
            }

            self.ctx.frontier.acknowledge();
            self.processed += 1;
        }

        self.transition(WorkerState::Stopped)?;
        tracing::debug!("worker {} stopped after {} urls", self.id, self.processed);
        Ok(self.processed)
    }

    /// Returns to `Idle` after a failed item so the next one can start
    fn recover(&mut self) {
        if self.state.is_busy() {
            tracing::debug!("worker {}: resetting {} -> idle", self.id, self.state);
        }
        self.state = WorkerState::Idle;
    }

    async fn process(&mut self, url: &Url) -> Result<(), RippleError> {
        self.transition(WorkerState::Fetching)?;

        let response = match self.ctx.fetcher.send(url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("{}", e);
                self.ctx.counters.record_transport_error();
                return self.transition(WorkerState::Idle);
            }
        };

        let outcome = self.ctx.fetcher.classify(url, response).await;
        self.ctx.emit(CrawlRecord::new(url.as_str(), outcome.status));

        match outcome.kind {
            FetchKind::Redirect(target) => {
                self.transition(WorkerState::Redirecting)?;
                self.ctx.counters.record_redirect();

                if !self.ctx.policy.allowed(&target) {
                    tracing::info!("redirect from {} leaves the site: {}", url, target);
                    self.ctx.counters.record_links_rejected(1);
                } else if self.ctx.admit(target.clone()) {
                    tracing::info!("redirect to {} from {}", target, url);
                } else {
                    tracing::debug!("redirect to already seen {} from {}", target, url);
                }
            }
            FetchKind::BadRedirect(reason) => {
                tracing::info!("not following redirect from {}: {}", url, reason);
                self.ctx.counters.record_redirect();
                self.ctx.counters.record_bad_redirect();
            }
            FetchKind::Page(links) => {
                self.transition(WorkerState::Extracting)?;
                self.ctx.counters.record_page_parsed();
                self.ctx.admit_links(url, links);
            }
            FetchKind::Skipped => {}
            FetchKind::Error(reason) => {
                tracing::info!("error reading {}: {}", url, reason);
                self.ctx.counters.record_transport_error();
            }
        }

        self.transition(WorkerState::Idle)
    }
}
