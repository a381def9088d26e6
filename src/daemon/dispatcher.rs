//! Event dispatcher: turns controller events into log writes and alerts.
//!
//! The dispatcher runs as its own task, so slow disks or notification tools
//! never delay a tick. Every failure is logged and swallowed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::timer::TimerEvent;
use crate::logger::{LogError, SessionLogger};
use crate::notification::{NotificationError, NotificationSink};
use crate::types::SessionRecord;

/// Default upper bound on a single notification.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Consumes `TimerEvent`s and performs their side effects.
pub struct EventDispatcher {
    logger: Arc<dyn SessionLogger>,
    notifier: Arc<dyn NotificationSink>,
    notify_timeout: Duration,
}

impl EventDispatcher {
    /// Creates a dispatcher with the default notification timeout.
    pub fn new(logger: Arc<dyn SessionLogger>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            logger,
            notifier,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Sets the notification timeout.
    pub fn with_notify_timeout(mut self, notify_timeout: Duration) -> Self {
        self.notify_timeout = notify_timeout;
        self
    }

    /// Processes events until every sender is dropped.
    pub async fn run(self, mut rx: mpsc::UnboundedReceiver<TimerEvent>) {
        info!(
            notifier = self.notifier.backend_name(),
            "event dispatcher started"
        );
        while let Some(event) = rx.recv().await {
            self.dispatch(event).await;
        }
        debug!("event channel closed; dispatcher stopping");
    }

    /// Performs the side effects of one event.
    pub async fn dispatch(&self, event: TimerEvent) {
        if let TimerEvent::FocusCompleted { record, .. } = &event {
            if let Err(e) = self.log_record(record.clone()).await {
                warn!("failed to write session log: {} ({})", e, e.suggestion());
            }
        }

        if let Some(message) = event.notification_message() {
            if let Err(e) = self.send_notification(message).await {
                if e.is_timeout() {
                    warn!("{}", e);
                } else {
                    debug!("notification failed: {}", e);
                }
            }
        }
    }

    async fn log_record(&self, record: SessionRecord) -> Result<(), LogError> {
        let logger = Arc::clone(&self.logger);
        tokio::task::spawn_blocking(move || logger.append(&record))
            .await
            .map_err(|e| LogError::Task(e.to_string()))?
    }

    async fn send_notification(&self, message: &'static str) -> Result<(), NotificationError> {
        let notifier = Arc::clone(&self.notifier);
        let task = tokio::task::spawn_blocking(move || notifier.notify(message));

        match timeout(self.notify_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(NotificationError::Task(e.to_string())),
            Err(_) => Err(NotificationError::Timeout(self.notify_timeout.as_secs())),
        }
    }
}
