//! Notification error types.
//!
//! Every notification error is recoverable: an alert that cannot be shown
//! never stops the timer.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The desktop notification service rejected the alert.
    #[error("desktop notification failed: {0}")]
    Desktop(String),

    /// Writing the terminal alert failed.
    #[error("failed to write terminal alert: {0}")]
    Terminal(#[source] std::io::Error),

    /// Delivery did not finish in time.
    #[error("notification timed out after {0} seconds")]
    Timeout(u64),

    /// The delivery task itself failed.
    #[error("notification task failed: {0}")]
    Task(String),
}

impl NotificationError {
    /// Returns true if delivery timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns true if the desktop service was involved.
    #[must_use]
    pub fn is_desktop_error(&self) -> bool {
        matches!(self, Self::Desktop(_))
    }

    /// Returns true if the timer should carry on. Always true.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Desktop(_) => "Check that a notification daemon is running, or use --no-notify",
            Self::Terminal(_) => "Check that the daemon still has a terminal attached",
            Self::Timeout(_) => "The notification service is slow to respond; alerts are skipped",
            Self::Task(_) => "Restart the daemon",
        }
    }
}
