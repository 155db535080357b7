//! CSV persistence of scraped records
//!
//! Records are accumulated in memory and written:
//! - as a checkpoint every `checkpoint-interval` records
//! - as a timestamped final file at the end of the run

use crate::config::OutputConfig;
use crate::output::error_log::write_error_log;
use crate::record::{CompanyRecord, ErrorEntry, RECORD_FIELDS};
use crate::ProspectError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Formats a timestamp for file names (`20250524_152732`)
pub fn file_timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Writes records to a CSV file, header included even when empty
pub fn write_records(path: &Path, records: &[CompanyRecord]) -> Result<(), ProspectError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(RECORD_FIELDS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads records back from a CSV file written by [`write_records`]
pub fn read_records(path: &Path) -> Result<Vec<CompanyRecord>, ProspectError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Accumulates records and persists them as the run progresses
pub struct ResultWriter {
    config: OutputConfig,
    records: Vec<CompanyRecord>,
}

impl ResultWriter {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CompanyRecord> {
        self.records
    }

    fn directory(&self) -> &Path {
        Path::new(&self.config.directory)
    }

    /// Path of the checkpoint holding `count` records
    pub fn checkpoint_path(&self, count: usize) -> PathBuf {
        self.directory().join(format!(
            "{}_{}_entries.csv",
            self.config.checkpoint_prefix, count
        ))
    }

    /// Appends a record and writes a checkpoint when one is due
    ///
    /// A failed checkpoint is logged and does not stop the run.
    ///
    /// # Returns
    ///
    /// The checkpoint path, when one was written
    pub fn push(&mut self, record: CompanyRecord) -> Option<PathBuf> {
        self.records.push(record);

        let count = self.records.len();
        if count % self.config.checkpoint_interval.max(1) != 0 {
            return None;
        }

        let path = self.checkpoint_path(count);
        match write_records(&path, &self.records) {
            Ok(()) => {
                tracing::info!("Checkpoint saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::warn!("Failed to write checkpoint {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Writes the final results file
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - The file written
    /// * `Ok(None)` - There were no records to write
    pub fn write_final(&self, now: &DateTime<Local>) -> Result<Option<PathBuf>, ProspectError> {
        if self.records.is_empty() {
            return Ok(None);
        }

        let path = self.directory().join(format!(
            "{}_{}.csv",
            self.config.final_prefix,
            file_timestamp(now)
        ));
        write_records(&path, &self.records)?;
        Ok(Some(path))
    }

    /// Writes the error log, only if there were errors
    pub fn write_errors(
        &self,
        errors: &[ErrorEntry],
        now: &DateTime<Local>,
    ) -> Result<Option<PathBuf>, ProspectError> {
        if errors.is_empty() {
            return Ok(None);
        }

        std::fs::create_dir_all(self.directory())?;
        let path = self.directory().join(format!(
            "{}_{}.txt",
            self.config.error_log_prefix,
            file_timestamp(now)
        ));
        write_error_log(&path, errors, now)?;
        Ok(Some(path))
    }
}
