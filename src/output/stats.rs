//! Crawl statistics
//!
//! Workers bump shared atomic counters while they run; the coordinator
//! snapshots them into a `CrawlStats` when the crawl ends.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters shared by every worker of one crawl
#[derive(Debug, Default)]
pub struct CrawlCounters {
    responses: AtomicU64,
    redirects: AtomicU64,
    bad_redirects: AtomicU64,
    pages_parsed: AtomicU64,
    links_rejected: AtomicU64,
    transport_errors: AtomicU64,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_response(&self) {
        self.responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_redirect(&self) {
        self.redirects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bad_redirect(&self) {
        self.bad_redirects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_parsed(&self) {
        self.pages_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_links_rejected(&self, count: u64) {
        self.links_rejected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn responses(&self) -> u64 {
        self.responses.load(Ordering::Relaxed)
    }

    pub fn redirects(&self) -> u64 {
        self.redirects.load(Ordering::Relaxed)
    }

    pub fn bad_redirects(&self) -> u64 {
        self.bad_redirects.load(Ordering::Relaxed)
    }

    pub fn pages_parsed(&self) -> u64 {
        self.pages_parsed.load(Ordering::Relaxed)
    }

    pub fn links_rejected(&self) -> u64 {
        self.links_rejected.load(Ordering::Relaxed)
    }

    pub fn transport_errors(&self) -> u64 {
        self.transport_errors.load(Ordering::Relaxed)
    }
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// The normalized root URL
    pub root: String,

    /// When the workers were started
    pub started_at: DateTime<Utc>,

    /// When the frontier drained (or the crawl was interrupted)
    pub finished_at: DateTime<Utc>,

    /// Wall-clock time between start and drain
    pub elapsed: Duration,

    /// Number of distinct URLs admitted to the frontier
    pub urls_visited: u64,

    /// Number of records emitted (one per HTTP response)
    pub responses: u64,

    /// Number of redirect responses
    pub redirects: u64,

    /// Number of redirect responses without a usable `Location`
    pub bad_redirects: u64,

    /// Number of pages whose links were extracted
    pub pages_parsed: u64,

    /// Number of extracted links rejected by the host policy
    pub links_rejected: u64,

    /// Number of fetches abandoned on transport errors
    pub transport_errors: u64,

    /// True if the crawl ended by interruption rather than drain
    pub interrupted: bool,
}

impl CrawlStats {
    /// Responses per second over the crawl's duration
    pub fn responses_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.responses as f64 / secs
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Root: {}", stats.root);
    println!("  Started: {}", stats.started_at.to_rfc3339());
    println!("  Finished: {}", stats.finished_at.to_rfc3339());
    println!(
        "  Elapsed: {:.3} secs{}",
        stats.elapsed.as_secs_f64(),
        if stats.interrupted {
            " (interrupted)"
        } else {
            ""
        }
    );
    println!();

    println!("Overview:");
    println!("  Distinct URLs visited: {}", stats.urls_visited);
    println!("  Responses recorded: {}", stats.responses);
    println!("  Redirects: {}", stats.redirects);
    println!("  Redirects without usable target: {}", stats.bad_redirects);
    println!("  Pages parsed: {}", stats.pages_parsed);
    println!("  Off-site links skipped: {}", stats.links_rejected);
    println!("  Transport errors: {}", stats.transport_errors);
    println!();

    println!(
        "Throughput: {:.2} responses/sec",
        stats.responses_per_second()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats(elapsed: Duration, responses: u64) -> CrawlStats {
        let now = Utc::now();
        CrawlStats {
            root: "http://example.com/".to_string(),
            started_at: now,
            finished_at: now,
            elapsed,
            urls_visited: 10,
            responses,
            redirects: 1,
            bad_redirects: 0,
            pages_parsed: 8,
            links_rejected: 3,
            transport_errors: 0,
            interrupted: false,
        }
    }

    #[test]
    fn test_counters_accumulate() {
        let counters = CrawlCounters::new();
        counters.record_response();
        counters.record_response();
        counters.record_redirect();
        counters.record_bad_redirect();
        counters.record_page_parsed();
        counters.record_links_rejected(4);
        counters.record_transport_error();

        assert_eq!(counters.responses(), 2);
        assert_eq!(counters.redirects(), 1);
        assert_eq!(counters.bad_redirects(), 1);
        assert_eq!(counters.pages_parsed(), 1);
        assert_eq!(counters.links_rejected(), 4);
        assert_eq!(counters.transport_errors(), 1);
    }

    #[test]
    fn test_responses_per_second() {
        let stats = sample_stats(Duration::from_secs(2), 10);
        assert!((stats.responses_per_second() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_responses_per_second_zero_elapsed() {
        let stats = sample_stats(Duration::ZERO, 10);
        assert_eq!(stats.responses_per_second(), 0.0);
    }
}
