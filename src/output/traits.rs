//! Record sink traits and types
//!
//! This module defines the trait interface for the sinks that receive one
//! record per HTTP response, and the record type itself.

use std::fmt;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One HTTP response received during the crawl
///
/// Created by a worker as soon as response headers arrive, redirects
/// included, and never mutated afterwards. Transport failures produce no
/// record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRecord {
    /// The requested URL (defragmented)
    pub url: String,

    /// HTTP status code of the response
    pub status: u16,
}

impl CrawlRecord {
    /// Creates a new record
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }
}

impl fmt::Display for CrawlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.url)
    }
}

/// Trait for record sinks
///
/// Sinks are shared by every worker, so implementations serialize their
/// own writes.
pub trait RecordSink: Send + Sync {
    /// Appends a record
    ///
    /// # Arguments
    ///
    /// * `record` - The response to record
    fn record(&self, record: &CrawlRecord) -> OutputResult<()>;

    /// Flushes buffered records and releases resources
    ///
    /// Called once when the crawl ends, whether it drained or was interrupted.
    fn finish(&self) -> OutputResult<()>;
}
