//! Command definitions for the Timebox CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{SessionConfig, StartParams};

/// Maximum task name length in characters.
const MAX_TASK_NAME_LENGTH: usize = 100;

// ============================================================================
// CLI Structure
// ============================================================================

/// Timebox - a Pomodoro timer with a background daemon
#[derive(Parser, Debug)]
#[command(
    name = "timebox",
    version,
    about = "Pomodoro timer with session logging",
    long_about = "Alternates focus sessions and breaks, with a long break every few sessions.\n\
                  Run `timebox daemon` once, then control it with start/pause/resume/reset/skip.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path (default: ~/.timebox/timebox.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the current mode from its full duration
    Start(StartArgs),

    /// Pause the countdown
    Pause,

    /// Resume a paused countdown
    Resume,

    /// Return to an idle focus session
    Reset,

    /// Finish the current session now and move to the next one
    Skip,

    /// Show current timer status
    Status,

    /// Show completed focus sessions from the session log
    History(HistoryArgs),

    /// Run the timer daemon in the foreground
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Start Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Focus duration in minutes (1-120)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    pub focus: u32,

    /// Short break duration in minutes (1-60)
    #[arg(
        short = 'b',
        long = "break",
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_minutes: u32,

    /// Long break duration in minutes (1-60)
    #[arg(
        short,
        long,
        default_value = "15",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub long_break: u32,

    /// Focus sessions before a long break (1-24)
    #[arg(
        short,
        long,
        default_value = "4",
        value_parser = clap::value_parser!(u32).range(1..=24)
    )]
    pub sessions: u32,

    /// Task name recorded in the session log
    #[arg(short, long, value_parser = validate_task_name)]
    pub task: Option<String>,

    /// Leave a running countdown alone instead of restarting it
    #[arg(long)]
    pub no_restart: bool,
}

impl Default for StartArgs {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self {
            focus: config.focus_minutes,
            break_minutes: config.break_minutes,
            long_break: config.long_break_minutes,
            sessions: config.sessions_before_long_break,
            task: None,
            no_restart: false,
        }
    }
}

impl StartArgs {
    /// Converts the arguments into start request parameters.
    ///
    /// The task name is always sent so a start without `--task` clears the
    /// previous one.
    pub fn to_params(&self) -> StartParams {
        StartParams {
            focus_minutes: Some(self.focus),
            break_minutes: Some(self.break_minutes),
            long_break_minutes: Some(self.long_break),
            sessions_before_long_break: Some(self.sessions),
            task_name: Some(self.task.clone().unwrap_or_default()),
            no_restart: self.no_restart.then_some(true),
        }
    }
}

// ============================================================================
// History / Daemon Arguments
// ============================================================================

/// Arguments for the history command
#[derive(Args, Debug, Clone, Default)]
pub struct HistoryArgs {
    /// Session log to read (default: ~/.timebox/sessions.csv)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Show only the most recent N sessions
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// Session log to append to (default: ~/.timebox/sessions.csv)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Disable desktop and terminal alerts
    #[arg(long)]
    pub no_notify: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the task name.
///
/// - May be empty (recorded as "No Task")
/// - Must not exceed 100 characters
fn validate_task_name(s: &str) -> Result<String, String> {
    if s.chars().count() > MAX_TASK_NAME_LENGTH {
        return Err(format!(
            "task name must be at most {} characters",
            MAX_TASK_NAME_LENGTH
        ));
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
