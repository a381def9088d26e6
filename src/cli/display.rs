//! Display utilities for the Timebox CLI.
//!
//! This module provides formatted output for:
//! - Command confirmations
//! - Error messages
//! - Status display with a progress bar
//! - Session history

use crate::types::{format_clock, IpcResponse, ResponseData, SessionRecord};

/// Width of the status progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 30;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a success message for timer start.
    pub fn show_start_success(response: &IpcResponse) {
        println!("{}", Self::render_confirmation(">", response));
    }

    /// Shows a success message for timer pause.
    pub fn show_pause_success(response: &IpcResponse) {
        println!("{}", Self::render_confirmation("||", response));
    }

    /// Shows a success message for timer resume.
    pub fn show_resume_success(response: &IpcResponse) {
        println!("{}", Self::render_confirmation(">", response));
    }

    /// Shows a success message for timer reset.
    pub fn show_reset_success(response: &IpcResponse) {
        println!("{}", Self::render_confirmation("[]", response));
    }

    /// Shows a success message for skip.
    pub fn show_skip_success(response: &IpcResponse) {
        println!("{}", Self::render_confirmation(">>", response));
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        println!("{}", Self::render_status(response));
    }

    /// Shows completed sessions, most recent last.
    pub fn show_history(records: &[SessionRecord], limit: Option<usize>) {
        println!("{}", Self::render_history(records, limit));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn render_confirmation(symbol: &str, response: &IpcResponse) -> String {
        let mut out = format!("{} {}", symbol, response.message);
        if let Some(data) = &response.data {
            if let Some(task) = &data.task_name {
                out.push_str(&format!("\n  Task: {}", task));
            }
            if let Some(remaining) = data.remaining_seconds {
                out.push_str(&format!("\n  Remaining: {}", format_clock(remaining)));
            }
        }
        out
    }

    fn render_status(response: &IpcResponse) -> String {
        let Some(data) = &response.data else {
            return "Timer is not running".to_string();
        };

        let mut lines = vec!["Timebox status".to_string(), "─".repeat(PROGRESS_BAR_WIDTH + 7)];

        let mode = Self::mode_display(data);
        let state = if data.running.unwrap_or(false) {
            "running"
        } else if data.remaining_seconds.unwrap_or(0) > 0 {
            "paused"
        } else {
            "idle"
        };
        lines.push(format!("Mode:      {} ({})", mode, state));

        let remaining = data.remaining_seconds.unwrap_or(0);
        let display = data
            .remaining_display
            .clone()
            .unwrap_or_else(|| format_clock(remaining));
        lines.push(format!("Remaining: {}", display));
        lines.push(Self::progress_bar(data.progress.unwrap_or(0.0), PROGRESS_BAR_WIDTH));

        if let Some(count) = data.completed_focus_sessions {
            lines.push(format!("Completed: {} focus session(s)", count));
        }
        if let Some(task) = &data.task_name {
            lines.push(format!("Task:      {}", task));
        }

        lines.join("\n")
    }

    fn render_history(records: &[SessionRecord], limit: Option<usize>) -> String {
        if records.is_empty() {
            return "No completed focus sessions yet".to_string();
        }

        let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
        let shown = &records[skip..];

        let mut lines: Vec<String> = shown
            .iter()
            .map(|record| {
                format!(
                    "{}  {:>3} min  {}",
                    record.formatted_timestamp(),
                    record.focus_minutes,
                    record.task_name
                )
            })
            .collect();

        let total_minutes: u64 = shown.iter().map(|r| u64::from(r.focus_minutes)).sum();
        lines.push(format!(
            "{} session(s), {} minute(s) focused",
            shown.len(),
            total_minutes
        ));
        lines.join("\n")
    }

    fn mode_display(data: &ResponseData) -> &'static str {
        data.mode.map_or("unknown", |mode| mode.display_name())
    }

    /// Renders `[#####-----]  50%` for a progress fraction.
    fn progress_bar(progress: f64, width: usize) -> String {
        let progress = progress.clamp(0.0, 1.0);
        let filled = ((progress * width as f64).round() as usize).min(width);
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(width - filled),
            (progress * 100.0).round() as u32
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
