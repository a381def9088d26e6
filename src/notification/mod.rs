//! User alerts on session boundaries.
//!
//! This module provides:
//! - `NotificationSink`: the trait the daemon delivers alerts through
//! - `NotificationBackend`: the strategy chosen once at startup
//! - `DesktopNotifier` / `TerminalNotifier`: the concrete strategies
//! - `MockNotificationSink`: an in-memory sink for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use timebox::notification::{NotificationBackend, NotificationSink};
//!
//! let backend = NotificationBackend::detect();
//! let _ = backend.notify("Focus session complete!");
//! ```

mod desktop;
pub mod error;
mod terminal;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;
pub use self::terminal::TerminalNotifier;

/// Title shown on every alert.
pub const NOTIFICATION_TITLE: &str = "Timebox";

/// Alert sent when a focus session ends.
pub const FOCUS_COMPLETE_MESSAGE: &str = "Focus session complete!";

/// Alert sent when a break ends.
pub const BREAK_OVER_MESSAGE: &str = "Break is over! Back to focus.";

// ============================================================================
// NotificationSink Trait
// ============================================================================

/// Best-effort alert delivery.
///
/// Implementations may block; the daemon calls them from a blocking worker
/// under a timeout.
pub trait NotificationSink: Send + Sync {
    /// Shows `message` to the user.
    fn notify(&self, message: &str) -> Result<(), NotificationError>;

    /// Short name of the delivery mechanism, for logs.
    fn backend_name(&self) -> &'static str;
}

// ============================================================================
// NotificationBackend
// ============================================================================

/// Alert strategy selected once when the daemon starts.
#[derive(Debug)]
pub enum NotificationBackend {
    /// Native desktop notification, with the terminal as fallback
    Desktop {
        /// Primary notifier
        desktop: DesktopNotifier,
        /// Used when the desktop service fails
        fallback: TerminalNotifier,
    },
    /// Terminal bell and boxed message
    Terminal(TerminalNotifier),
    /// Alerts switched off
    Disabled,
}

impl NotificationBackend {
    /// Probes for a desktop notification service and falls back to the terminal.
    pub fn detect() -> Self {
        match DesktopNotifier::probe() {
            Some(desktop) => Self::Desktop {
                desktop,
                fallback: TerminalNotifier::new(),
            },
            None => {
                debug!("desktop notifications unavailable; using terminal alerts");
                Self::Terminal(TerminalNotifier::new())
            }
        }
    }

    /// Returns true if alerts are switched off.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl NotificationSink for NotificationBackend {
    fn notify(&self, message: &str) -> Result<(), NotificationError> {
        match self {
            Self::Desktop { desktop, fallback } => notify_with_fallback(desktop, fallback, message),
            Self::Terminal(terminal) => terminal.notify(message),
            Self::Disabled => {
                debug!(message, "notifications disabled");
                Ok(())
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            Self::Desktop { desktop, .. } => desktop.backend_name(),
            Self::Terminal(terminal) => terminal.backend_name(),
            Self::Disabled => "disabled",
        }
    }
}

/// Delivers through `primary`, writing to `fallback` if that fails.
fn notify_with_fallback(
    primary: &dyn NotificationSink,
    fallback: &dyn NotificationSink,
    message: &str,
) -> Result<(), NotificationError> {
    primary.notify(message).or_else(|e| {
        debug!(
            "{} notification failed ({}); using {}",
            primary.backend_name(),
            e,
            fallback.backend_name()
        );
        fallback.notify(message)
    })
}

// ============================================================================
// MockNotificationSink
// ============================================================================

/// Records alerts in memory.
#[derive(Debug, Default)]
pub struct MockNotificationSink {
    messages: Mutex<Vec<String>>,
    should_fail: AtomicBool,
    delay_ms: AtomicU64,
}

impl MockNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Makes every following `notify` block for `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.lock().map(|messages| messages.len()).unwrap_or(0)
    }
}

impl NotificationSink for MockNotificationSink {
    fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Task("Mock failure".to_string()));
        }
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
