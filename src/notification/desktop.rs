//! Native desktop notifications via `notify-rust`.
//!
//! On Linux and the BSDs the notification server is queried over D-Bus once at
//! startup; no server means the desktop backend is unavailable and the caller
//! falls back to the terminal. macOS and Windows always report a backend and
//! rely on `show()` failing at delivery time instead.

use notify_rust::Notification;
use tracing::debug;

use super::{NotificationError, NotificationSink, NOTIFICATION_TITLE};

/// Sends notifications through the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    server: Option<String>,
}

impl DesktopNotifier {
    /// Checks whether a notification service is reachable.
    #[cfg(all(unix, not(target_os = "macos")))]
    pub fn probe() -> Option<Self> {
        match notify_rust::get_server_information() {
            Ok(info) => {
                debug!(server = %info.name, version = %info.version, "notification server found");
                Some(Self {
                    server: Some(info.name),
                })
            }
            Err(e) => {
                debug!("no notification server: {}", e);
                None
            }
        }
    }

    /// Checks whether a notification service is reachable.
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    pub fn probe() -> Option<Self> {
        debug!("using the platform notification API");
        Some(Self { server: None })
    }

    /// Name of the notification server, when the platform reports one.
    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, message: &str) -> Result<(), NotificationError> {
        build_notification(message)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::Desktop(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "desktop"
    }
}

fn build_notification(message: &str) -> Notification {
    let mut notification = Notification::new();
    notification
        .summary(NOTIFICATION_TITLE)
        .body(message)
        .appname(NOTIFICATION_TITLE)
        .icon("alarm-clock");
    notification
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_notification() {
        let notification = build_notification("Focus session complete!");

        assert_eq!(notification.summary, "Timebox");
        assert_eq!(notification.body, "Focus session complete!");
        assert_eq!(notification.appname, "Timebox");
    }

    #[test]
    fn test_backend_name() {
        let notifier = DesktopNotifier { server: None };
        assert_eq!(notifier.backend_name(), "desktop");
        assert!(notifier.server().is_none());
    }
}
