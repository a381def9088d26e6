//! CSV-backed session log.
//!
//! Rows are `timestamp,task,minutes` with no header, appended one per
//! completed focus session.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use super::{LogError, SessionLogger};
use crate::types::{SessionRecord, TIMESTAMP_FORMAT};

/// Appends session records to a CSV file.
#[derive(Debug, Clone)]
pub struct CsvSessionLogger {
    path: PathBuf,
}

impl CsvSessionLogger {
    /// Creates a logger writing to `path`. Nothing is touched until the first
    /// append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every well-formed record in the log, oldest first.
    ///
    /// A missing file yields an empty list. Malformed rows, including rows
    /// that are not valid UTF-8, are skipped with a warning.
    pub fn read_records(&self) -> Result<Vec<SessionRecord>, LogError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (index, row) in reader.byte_records().enumerate() {
            let row = row?;
            let line = row.position().map_or(index as u64 + 1, |p| p.line());
            match parse_row(&row, line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("{}", e),
            }
        }
        Ok(records)
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionLogger for CsvSessionLogger {
    fn append(&self, record: &SessionRecord) -> Result<(), LogError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        let minutes = record.focus_minutes.to_string();
        writer.write_record([
            record.formatted_timestamp().as_str(),
            record.task_name.as_str(),
            minutes.as_str(),
        ])?;
        writer.flush().map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), task = %record.task_name, "session record appended");
        Ok(())
    }
}

fn parse_row(row: &csv::ByteRecord, line: u64) -> Result<SessionRecord, LogError> {
    let malformed = |reason: String| LogError::Malformed { line, reason };

    if row.len() != 3 {
        return Err(malformed(format!("expected 3 fields, found {}", row.len())));
    }

    let field = |i: usize| {
        std::str::from_utf8(&row[i])
            .map_err(|e| malformed(format!("field {} is not valid UTF-8: {}", i + 1, e)))
    };
    let (raw_timestamp, task_name, raw_minutes) = (field(0)?, field(1)?, field(2)?);

    let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT)
        .map_err(|e| malformed(format!("bad timestamp '{}': {}", raw_timestamp, e)))?;
    let focus_minutes = raw_minutes
        .trim()
        .parse::<u32>()
        .map_err(|e| malformed(format!("bad minutes '{}': {}", raw_minutes, e)))?;

    Ok(SessionRecord::at(timestamp, task_name, focus_minutes))
}
