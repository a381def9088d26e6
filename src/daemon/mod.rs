//! Daemon module for the Timebox tracker.
//!
//! This module contains the core daemon functionality:
//! - `timer`: Session controller with state transitions and countdown logic
//! - `scheduler`: One-second tick driver
//! - `dispatcher`: Session log writes and notifications, off the tick path
//! - `ipc`: Unix socket server answering CLI requests

pub mod dispatcher;
pub mod ipc;
pub mod scheduler;
pub mod timer;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::logger::{CsvSessionLogger, SessionLogger};
use crate::notification::{NotificationBackend, NotificationSink};
use crate::types::SessionConfig;

pub use dispatcher::{EventDispatcher, DEFAULT_NOTIFY_TIMEOUT};
pub use ipc::{IpcError, IpcServer, RequestHandler};
pub use scheduler::{Scheduler, TICK_PERIOD};
pub use timer::{SessionController, TickOutcome, TimerEvent, Transition};

/// How long shutdown waits for pending log writes and alerts.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything the daemon needs to run.
pub struct DaemonOptions {
    /// Unix socket to listen on
    pub socket_path: PathBuf,
    /// Session log file
    pub log_path: PathBuf,
    /// Initial configuration
    pub config: SessionConfig,
    /// Alert strategy
    pub notifications: NotificationBackend,
}

/// Runs the daemon until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound or the listener fails.
pub async fn run_daemon(options: DaemonOptions) -> Result<()> {
    let server = IpcServer::new(&options.socket_path)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let controller = Arc::new(Mutex::new(SessionController::new(options.config, event_tx)));

    let logger: Arc<dyn SessionLogger> = Arc::new(CsvSessionLogger::new(&options.log_path));
    let notifier: Arc<dyn NotificationSink> = Arc::new(options.notifications);
    let dispatcher = tokio::spawn(EventDispatcher::new(logger, notifier).run(event_rx));

    let scheduler = tokio::spawn(Scheduler::new(Arc::clone(&controller)).run());
    let handler = Arc::new(RequestHandler::new(Arc::clone(&controller)));

    info!(
        socket = %server.socket_path().display(),
        log = %options.log_path.display(),
        "daemon listening"
    );

    let result = tokio::select! {
        result = server.serve(handler) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            Ok(())
        }
    };

    scheduler.abort();
    // Dropping the controller closes the event channel once in-flight
    // connection tasks finish.
    drop(controller);
    drop(server);
    if tokio::time::timeout(SHUTDOWN_DRAIN_TIMEOUT, dispatcher)
        .await
        .is_err()
    {
        warn!("pending session log writes did not finish before shutdown");
    }

    result
}
