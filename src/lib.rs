//! Timebox Library
//!
//! This library provides the core functionality for the Timebox Pomodoro CLI.
//! It includes:
//! - Session controller managing the Focus/Break/Long Break cycle
//! - Scheduler and event dispatcher hosting the controller in a daemon
//! - IPC server/client for daemon-CLI communication
//! - Append-only CSV session log
//! - Desktop and terminal notifications
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state

pub mod cli;
pub mod daemon;
pub mod logger;
pub mod notification;
pub mod paths;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ConfigError, IpcRequest, IpcResponse, ResponseData, SessionConfig, SessionMode,
    SessionRecord, StartParams, TimerState,
};

pub use daemon::{
    run_daemon, DaemonOptions, EventDispatcher, Scheduler, SessionController, TickOutcome,
    TimerEvent, Transition,
};

pub use logger::{CsvSessionLogger, LogError, MockSessionLogger, SessionLogger};

pub use notification::{
    MockNotificationSink, NotificationBackend, NotificationError, NotificationSink,
};
