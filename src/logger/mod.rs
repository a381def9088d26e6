//! Append-only session log.
//!
//! This module provides:
//! - `SessionLogger`: the trait the daemon writes completed focus sessions to
//! - `CsvSessionLogger`: the file-backed implementation
//! - `MockSessionLogger`: an in-memory implementation for tests

mod csv_file;
mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use csv_file::CsvSessionLogger;
pub use error::LogError;

use crate::types::SessionRecord;

// ============================================================================
// SessionLogger Trait
// ============================================================================

/// Durable, append-only store of completed focus sessions.
///
/// Implementations are called from a blocking worker thread, never from the
/// tick path.
pub trait SessionLogger: Send + Sync {
    /// Appends one record. Existing records are never rewritten.
    fn append(&self, record: &SessionRecord) -> Result<(), LogError>;
}

// ============================================================================
// MockSessionLogger
// ============================================================================

/// In-memory session logger for tests.
#[derive(Debug, Default)]
pub struct MockSessionLogger {
    records: Mutex<Vec<SessionRecord>>,
    should_fail: AtomicBool,
}

impl MockSessionLogger {
    /// Creates an empty mock logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following append fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of the appended records.
    pub fn records(&self) -> Vec<SessionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Returns the number of appended records.
    pub fn count(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }
}

impl SessionLogger for MockSessionLogger {
    fn append(&self, record: &SessionRecord) -> Result<(), LogError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(LogError::Io {
                path: "mock".into(),
                source: std::io::Error::other("mock failure"),
            });
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
        Ok(())
    }
}
