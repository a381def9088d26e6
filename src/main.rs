//! Timebox CLI - a Pomodoro timer with session logging
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 focus sessions

use anyhow::Result;
use clap::{CommandFactory, Parser};

use timebox::cli::{Cli, Commands, DaemonArgs, Display, HistoryArgs, IpcClient};
use timebox::daemon::{run_daemon, DaemonOptions};
use timebox::logger::CsvSessionLogger;
use timebox::notification::NotificationBackend;
use timebox::paths;
use timebox::types::SessionConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects `info` and the
/// default is `warn`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let client = || -> Result<IpcClient> {
        match &cli.socket {
            Some(path) => Ok(IpcClient::with_socket_path(path.clone())),
            None => IpcClient::new(),
        }
    };

    match cli.command.clone() {
        Some(Commands::Start(args)) => {
            let response = client()?.start(&args).await?;
            Display::show_start_success(&response);
        }
        Some(Commands::Pause) => {
            let response = client()?.pause().await?;
            Display::show_pause_success(&response);
        }
        Some(Commands::Resume) => {
            let response = client()?.resume().await?;
            Display::show_resume_success(&response);
        }
        Some(Commands::Reset) => {
            let response = client()?.reset().await?;
            Display::show_reset_success(&response);
        }
        Some(Commands::Skip) => {
            let response = client()?.skip().await?;
            Display::show_skip_success(&response);
        }
        Some(Commands::Status) => {
            let response = client()?.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::History(args)) => show_history(args)?,
        Some(Commands::Daemon(args)) => start_daemon(&cli, args).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Prints the session log.
fn show_history(args: HistoryArgs) -> Result<()> {
    let path = match args.log_file {
        Some(path) => path,
        None => paths::default_log_path()?,
    };
    let records = CsvSessionLogger::new(path).read_records()?;
    Display::show_history(&records, args.limit);
    Ok(())
}

/// Runs the daemon in the foreground until Ctrl-C.
async fn start_daemon(cli: &Cli, args: DaemonArgs) -> Result<()> {
    let socket_path = match &cli.socket {
        Some(path) => path.clone(),
        None => paths::default_socket_path()?,
    };
    let log_path = match args.log_file {
        Some(path) => path,
        None => paths::default_log_path()?,
    };
    let notifications = if args.no_notify {
        NotificationBackend::Disabled
    } else {
        NotificationBackend::detect()
    };

    tracing::info!(backend = ?notifications, "starting daemon");

    run_daemon(DaemonOptions {
        socket_path,
        log_path,
        config: SessionConfig::default(),
        notifications,
    })
    .await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
