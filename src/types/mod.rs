//! Core data types for the Timebox tracker.
//!
//! This module defines the data structures used for:
//! - Session modes and the live timer state
//! - Session configuration with bounds checking
//! - Completed focus session records
//! - IPC request/response serialization

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label written to the session log when no task name was configured.
pub const NO_TASK_LABEL: &str = "No Task";

/// Timestamp layout used in the session log (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// SessionMode
// ============================================================================

/// The kind of interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Focused work interval
    #[default]
    Focus,
    /// Short break between focus sessions
    Break,
    /// Extended break granted every Nth focus session
    LongBreak,
}

impl SessionMode {
    /// Returns the wire representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Focus => "focus",
            SessionMode::Break => "break",
            SessionMode::LongBreak => "long_break",
        }
    }

    /// Returns the human readable name of the mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionMode::Focus => "Focus",
            SessionMode::Break => "Break",
            SessionMode::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Allowed focus duration in minutes.
pub const FOCUS_MINUTES_RANGE: (u32, u32) = (1, 120);
/// Allowed short break duration in minutes.
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);
/// Allowed long break duration in minutes.
pub const LONG_BREAK_MINUTES_RANGE: (u32, u32) = (1, 60);
/// Allowed number of focus sessions between long breaks.
pub const SESSIONS_BEFORE_LONG_BREAK_RANGE: (u32, u32) = (1, 24);

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("focus duration must be between 1 and 120 minutes (got {0})")]
    FocusMinutes(u32),

    #[error("break duration must be between 1 and 60 minutes (got {0})")]
    BreakMinutes(u32),

    #[error("long break duration must be between 1 and 60 minutes (got {0})")]
    LongBreakMinutes(u32),

    #[error("sessions before a long break must be between 1 and 24 (got {0})")]
    SessionsBeforeLongBreak(u32),
}

/// User-tunable parameters of the timer.
///
/// The controller only reads the configuration when a session begins, so a
/// change never alters a countdown that is already running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Focus duration in minutes (1-120)
    pub focus_minutes: u32,
    /// Short break duration in minutes (1-60)
    pub break_minutes: u32,
    /// Long break duration in minutes (1-60)
    pub long_break_minutes: u32,
    /// Focus sessions before a long break (1-24)
    pub sessions_before_long_break: u32,
    /// Optional label for the task being worked on
    pub task_name: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
            task_name: None,
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with the specified focus duration.
    pub fn with_focus_minutes(mut self, minutes: u32) -> Self {
        self.focus_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified break duration.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified long break interval.
    pub fn with_sessions_before_long_break(mut self, sessions: u32) -> Self {
        self.sessions_before_long_break = sessions;
        self
    }

    /// Creates a new configuration with the specified task name.
    pub fn with_task_name(mut self, task_name: impl Into<String>) -> Self {
        self.task_name = Some(task_name.into());
        self
    }

    /// Returns the configured length of `mode` in minutes.
    pub fn duration_minutes(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Focus => self.focus_minutes,
            SessionMode::Break => self.break_minutes,
            SessionMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Returns the configured length of `mode` in seconds.
    pub fn duration_seconds(&self, mode: SessionMode) -> u32 {
        self.duration_minutes(mode).saturating_mul(60)
    }

    /// Returns the task label used for session records.
    pub fn task_label(&self) -> &str {
        match self.task_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => NO_TASK_LABEL,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first value found outside its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !in_range(self.focus_minutes, FOCUS_MINUTES_RANGE) {
            return Err(ConfigError::FocusMinutes(self.focus_minutes));
        }
        if !in_range(self.break_minutes, BREAK_MINUTES_RANGE) {
            return Err(ConfigError::BreakMinutes(self.break_minutes));
        }
        if !in_range(self.long_break_minutes, LONG_BREAK_MINUTES_RANGE) {
            return Err(ConfigError::LongBreakMinutes(self.long_break_minutes));
        }
        if !in_range(
            self.sessions_before_long_break,
            SESSIONS_BEFORE_LONG_BREAK_RANGE,
        ) {
            return Err(ConfigError::SessionsBeforeLongBreak(
                self.sessions_before_long_break,
            ));
        }
        Ok(())
    }

    /// Returns a copy with every value clamped into its allowed range.
    ///
    /// Zero durations become one minute, so the controller never runs a
    /// zero-length countdown.
    pub fn sanitized(mut self) -> Self {
        self.focus_minutes = clamp(self.focus_minutes, FOCUS_MINUTES_RANGE);
        self.break_minutes = clamp(self.break_minutes, BREAK_MINUTES_RANGE);
        self.long_break_minutes = clamp(self.long_break_minutes, LONG_BREAK_MINUTES_RANGE);
        self.sessions_before_long_break = clamp(
            self.sessions_before_long_break,
            SESSIONS_BEFORE_LONG_BREAK_RANGE,
        );
        self
    }
}

fn in_range(value: u32, (min, max): (u32, u32)) -> bool {
    (min..=max).contains(&value)
}

fn clamp(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}

// ============================================================================
// TimerState
// ============================================================================

/// Live countdown state owned by the session controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current mode
    pub mode: SessionMode,
    /// Seconds left in the current session
    pub remaining_seconds: u32,
    /// Full length of the current session in seconds
    pub duration_seconds: u32,
    /// Whether the countdown is decrementing
    pub running: bool,
    /// Focus sessions completed (naturally or by skipping)
    pub completed_focus_sessions: u32,
}

impl TimerState {
    /// Creates the initial state: Focus, nothing counted down, not running.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a full-length countdown for `mode`.
    pub fn begin(&mut self, mode: SessionMode, duration_seconds: u32) {
        self.mode = mode;
        self.duration_seconds = duration_seconds;
        self.remaining_seconds = duration_seconds;
        self.running = true;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns false without changing anything when the timer is stopped or
    /// already at zero.
    pub fn decrement(&mut self) -> bool {
        if self.running && self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            true
        } else {
            false
        }
    }

    /// Stops the countdown, keeping the remaining time.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Restarts the countdown if there is time left.
    ///
    /// Returns true if the timer is now running.
    pub fn resume(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.running = true;
        }
        self.running
    }

    /// Returns to Focus with nothing counted down.
    ///
    /// The completed session counter is preserved.
    pub fn reset(&mut self) {
        self.mode = SessionMode::Focus;
        self.remaining_seconds = 0;
        self.duration_seconds = 0;
        self.running = false;
    }

    /// Returns true if the countdown has run out while still running.
    pub fn is_expired(&self) -> bool {
        self.running && self.remaining_seconds == 0
    }

    /// Fraction of the current session already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        let elapsed = self.duration_seconds.saturating_sub(self.remaining_seconds);
        (f64::from(elapsed) / f64::from(self.duration_seconds)).clamp(0.0, 1.0)
    }

    /// Remaining time as zero-padded `MM:SS`.
    pub fn remaining_display(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

/// Formats a second count as zero-padded `MM:SS`.
pub fn format_clock(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// SessionRecord
// ============================================================================

/// One completed focus session, as written to the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Local wall-clock completion time, second precision
    pub timestamp: NaiveDateTime,
    /// Task label (`No Task` when none was configured)
    pub task_name: String,
    /// Configured focus duration at completion time
    pub focus_minutes: u32,
}

impl SessionRecord {
    /// Creates a record stamped with the current local time.
    pub fn now(config: &SessionConfig) -> Self {
        let now = Local::now().naive_local();
        Self::at(
            now.with_nanosecond(0).unwrap_or(now),
            config.task_label(),
            config.focus_minutes,
        )
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(timestamp: NaiveDateTime, task_name: impl Into<String>, focus_minutes: u32) -> Self {
        let task_name = task_name.into();
        Self {
            timestamp,
            task_name: if task_name.is_empty() {
                NO_TASK_LABEL.to_string()
            } else {
                task_name
            },
            focus_minutes,
        }
    }

    /// Returns the timestamp in log format.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// Parameters for the start command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartParams {
    /// Focus duration in minutes
    #[serde(rename = "focusMinutes", skip_serializing_if = "Option::is_none")]
    pub focus_minutes: Option<u32>,
    /// Break duration in minutes
    #[serde(rename = "breakMinutes", skip_serializing_if = "Option::is_none")]
    pub break_minutes: Option<u32>,
    /// Long break duration in minutes
    #[serde(rename = "longBreakMinutes", skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<u32>,
    /// Focus sessions before a long break
    #[serde(
        rename = "sessionsBeforeLongBreak",
        skip_serializing_if = "Option::is_none"
    )]
    pub sessions_before_long_break: Option<u32>,
    /// Task name
    #[serde(rename = "taskName", skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    /// Refuse to restart a countdown that is already running
    #[serde(rename = "noRestart", skip_serializing_if = "Option::is_none")]
    pub no_restart: Option<bool>,
}

impl StartParams {
    /// Returns `base` with every provided override applied.
    pub fn apply_to(&self, base: &SessionConfig) -> SessionConfig {
        let mut config = base.clone();
        if let Some(focus) = self.focus_minutes {
            config.focus_minutes = focus;
        }
        if let Some(brk) = self.break_minutes {
            config.break_minutes = brk;
        }
        if let Some(long_brk) = self.long_break_minutes {
            config.long_break_minutes = long_brk;
        }
        if let Some(sessions) = self.sessions_before_long_break {
            config.sessions_before_long_break = sessions;
        }
        if let Some(task) = &self.task_name {
            config.task_name = Some(task.clone());
        }
        config
    }
}

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Start (or restart) the countdown for the current mode
    Start {
        /// Start parameters
        #[serde(flatten)]
        params: StartParams,
    },
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Return to an idle Focus state
    Reset,
    /// Complete the current session immediately
    Skip,
    /// Query the current status
    Status,
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SessionMode>,
    /// Remaining seconds
    #[serde(rename = "remainingSeconds", skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Remaining time as `MM:SS`
    #[serde(rename = "remainingDisplay", skip_serializing_if = "Option::is_none")]
    pub remaining_display: Option<String>,
    /// Elapsed fraction of the current session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Whether the countdown is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running: Option<bool>,
    /// Completed focus sessions
    #[serde(
        rename = "completedFocusSessions",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_focus_sessions: Option<u32>,
    /// Current task name
    #[serde(rename = "taskName", skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
}

impl ResponseData {
    /// Creates response data from the timer state and active configuration.
    pub fn from_timer_state(state: &TimerState, config: &SessionConfig) -> Self {
        Self {
            mode: Some(state.mode),
            remaining_seconds: Some(state.remaining_seconds),
            remaining_display: Some(state.remaining_display()),
            progress: Some(state.progress()),
            running: Some(state.running),
            completed_focus_sessions: Some(state.completed_focus_sessions),
            task_name: config.task_name.clone().filter(|name| !name.is_empty()),
        }
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true if the daemon reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Tests
// ============================================================================
