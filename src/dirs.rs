//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! | Purpose | Linux | macOS |
//! |---------|-------|-------|
//! | Data (roster database) | `~/.local/share/cf-roster/` | `~/Library/Application Support/cf-roster/` |
//! | Config | `~/.config/cf-roster/` | `~/Library/Application Support/cf-roster/` |
//!
//! # Environment Overrides
//!
//! - `CF_ROSTER_DATA_DIR` overrides [`data_dir`]
//! - `CF_ROSTER_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

const APP_DIR: &str = "cf-roster";

/// Application data root. Holds the roster database.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("CF_ROSTER_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/cf-roster-data"))
}

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("CF_ROSTER_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/cf-roster-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default roster database path (`data_dir()/roster.db`).
#[must_use]
pub fn database_file() -> PathBuf {
    data_dir().join("roster.db")
}
