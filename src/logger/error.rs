//! Session log error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing or reading the session log.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file or its directory could not be opened or created.
    #[error("cannot access session log {}: {source}", path.display())]
    Io {
        /// Path of the log file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A row could not be encoded or decoded.
    #[error("session log CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row was readable but did not hold a valid record.
    #[error("malformed session log row {line}: {reason}")]
    Malformed {
        /// 1-based line number
        line: u64,
        /// What was wrong with the row
        reason: String,
    },

    /// The blocking write task itself failed.
    #[error("session log task failed: {0}")]
    Task(String),
}

impl LogError {
    /// Returns true if this error came from the filesystem.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if a single row was unusable.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "Check that the log directory exists and is writable",
            Self::Csv(_) => "Check the session log for partially written rows",
            Self::Malformed { .. } => "Remove or fix the reported row in the session log",
            Self::Task(_) => "Restart the daemon",
        }
    }
}
