//! Output module for crawl records and statistics
//!
//! This module handles:
//! - The record sink contract (one record per HTTP response)
//! - Writing records to a CSV file or keeping them in memory
//! - Summarizing a finished crawl

mod csv_sink;
mod memory;
pub mod stats;
mod traits;

pub use csv_sink::{csv_output_path, CsvSink, CSV_HEADER};
pub use memory::MemorySink;
pub use stats::{print_statistics, CrawlCounters, CrawlStats};
pub use traits::{CrawlRecord, OutputError, OutputResult, RecordSink};
