//! Terminal fallback alert: a bell followed by a boxed message.

use std::io::{self, Write};
use std::sync::Mutex;

use super::{NotificationError, NotificationSink, NOTIFICATION_TITLE};

/// Writes alerts to a terminal stream (stderr by default).
pub struct TerminalNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalNotifier {
    /// Creates a notifier writing to stderr.
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Creates a notifier writing to `writer`.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminalNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalNotifier").finish_non_exhaustive()
    }
}

impl NotificationSink for TerminalNotifier {
    fn notify(&self, message: &str) -> Result<(), NotificationError> {
        let text = render_alert(message);
        let mut out = self
            .out
            .lock()
            .map_err(|e| NotificationError::Task(e.to_string()))?;
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(NotificationError::Terminal)
    }

    fn backend_name(&self) -> &'static str {
        "terminal"
    }
}

/// Renders the bell and boxed alert text.
fn render_alert(message: &str) -> String {
    let line = format!("{}: {}", NOTIFICATION_TITLE, message);
    let width = line.chars().count() + 2;
    let border = "─".repeat(width);
    format!("\x07┌{border}┐\n│ {line} │\n└{border}┘\n")
}
