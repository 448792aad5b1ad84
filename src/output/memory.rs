//! In-memory record sink, for embedding the crawler as a library

use crate::output::traits::{CrawlRecord, OutputError, OutputResult, RecordSink};
use std::sync::Mutex;

/// Record sink that keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<CrawlRecord>>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the records received so far, in arrival order
    pub fn records(&self) -> Vec<CrawlRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the records for one URL
    pub fn records_for(&self, url: &str) -> Vec<CrawlRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.url == url)
            .collect()
    }
}

impl RecordSink for MemorySink {
    fn record(&self, record: &CrawlRecord) -> OutputResult<()> {
        self.records
            .lock()
            .map_err(|_| OutputError::Write("memory sink lock poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }

    fn finish(&self) -> OutputResult<()> {
        Ok(())
    }
}
