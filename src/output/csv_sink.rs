//! CSV record sink
//!
//! Writes a `URL,Status Code` header row followed by one row per response.

use crate::output::traits::{CrawlRecord, OutputError, OutputResult, RecordSink};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Header row written before any record
pub const CSV_HEADER: [&str; 2] = ["URL", "Status Code"];

/// Resolves the configured output name into the CSV file path
///
/// A `.csv` extension is appended when the name has no extension, so
/// `results` becomes `results.csv` while `out/log.txt` is kept as is.
pub fn csv_output_path(name: &str) -> PathBuf {
    let path = PathBuf::from(name);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("csv")
    }
}

/// Record sink backed by a CSV file
pub struct CsvSink {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Creates (or truncates) the file and writes the header row
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - The sink is ready to receive records
    /// * `Err(OutputError)` - The file could not be created or written
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(writer),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> OutputResult<std::sync::MutexGuard<'_, csv::Writer<File>>> {
        self.writer
            .lock()
            .map_err(|_| OutputError::Write(format!("{} writer lock poisoned", self.path.display())))
    }
}

impl RecordSink for CsvSink {
    fn record(&self, record: &CrawlRecord) -> OutputResult<()> {
        let status = record.status.to_string();
        let mut writer = self.lock()?;
        writer.write_record([record.url.as_str(), status.as_str()])?;
        Ok(())
    }

    fn finish(&self) -> OutputResult<()> {
        let mut writer = self.lock()?;
        writer.flush()?;
        Ok(())
    }
}
