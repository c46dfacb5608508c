//! Path utilities for profile-maker data directories

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "PROFILE_MAKER_HOME";

/// Get the default data directory path (~/.profile-maker)
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".profile-maker"))
        .unwrap_or_else(|| PathBuf::from(".profile-maker"))
}

/// Get the base data directory.
/// Returns `$PROFILE_MAKER_HOME` if set, otherwise ~/.profile-maker
pub fn data_dir() -> PathBuf {
    match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_data_dir(),
    }
}

/// Get the logs directory (~/.profile-maker/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.profile-maker/logs/profile-maker.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("profile-maker.log")
}

/// Get the config file path (~/.profile-maker/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
