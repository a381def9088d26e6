//! Tests for the `timebox` binary's command-line surface.
//!
//! Commands that need a daemon are pointed at a socket nobody listens on.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn timebox() -> Command {
    Command::cargo_bin("timebox").unwrap()
}

#[test]
fn test_help_lists_commands() {
    timebox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("skip"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn test_completions_bash() {
    timebox()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timebox"));
}

#[test]
fn test_history_prints_logged_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("sessions.csv");
    fs::write(
        &log_path,
        "2026-01-05 09:00:00,Write report,25\n2026-01-05 10:00:00,No Task,50\n",
    )
    .unwrap();

    timebox()
        .arg("history")
        .arg("--log-file")
        .arg(&log_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-01-05 09:00:00"))
        .stdout(predicate::str::contains("Write report"))
        .stdout(predicate::str::contains("2 session(s), 75 minute(s) focused"));
}

#[test]
fn test_history_limit_shows_latest() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("sessions.csv");
    fs::write(
        &log_path,
        "2026-01-05 09:00:00,First,25\n2026-01-05 10:00:00,Second,25\n",
    )
    .unwrap();

    timebox()
        .args(["history", "-n", "1", "--log-file"])
        .arg(&log_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Second"))
        .stdout(predicate::str::contains("First").not());
}

#[test]
fn test_history_without_log_file() {
    let dir = tempfile::tempdir().unwrap();

    timebox()
        .arg("history")
        .arg("--log-file")
        .arg(dir.path().join("missing.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed focus sessions yet"));
}

#[test]
fn test_start_rejects_out_of_range_focus() {
    timebox()
        .args(["start", "--focus", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("focus"));
}

#[test]
fn test_status_without_daemon_fails() {
    let dir = tempfile::tempdir().unwrap();

    timebox()
        .arg("--socket")
        .arg(dir.path().join("nobody.sock"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Cannot connect to the daemon"));
}
