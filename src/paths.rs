//! Default on-disk locations, all under `~/.timebox/`.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name under the home directory.
const DATA_DIR_NAME: &str = ".timebox";

/// Socket file name.
const SOCKET_FILE_NAME: &str = "timebox.sock";

/// Session log file name.
const LOG_FILE_NAME: &str = "sessions.csv";

/// Returns `~/.timebox`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Returns the default daemon socket path, `~/.timebox/timebox.sock`.
pub fn default_socket_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(SOCKET_FILE_NAME))
}

/// Returns the default session log path, `~/.timebox/sessions.csv`.
pub fn default_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_share_data_dir() {
        let dir = data_dir().unwrap();
        assert!(dir.ends_with(".timebox"));
        assert_eq!(default_socket_path().unwrap(), dir.join("timebox.sock"));
        assert_eq!(default_log_path().unwrap(), dir.join("sessions.csv"));
    }
}
