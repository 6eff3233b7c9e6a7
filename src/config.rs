//! Configuration types for the roster sync engine.

use std::path::{Path, PathBuf};

use cf_client::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Default cap on concurrently running syncs.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Platform API client settings.
    pub client: ClientConfig,
    /// Batch sync settings.
    pub sync: SyncConfig,
    /// Record store settings.
    pub store: StoreConfig,
    /// Inactivity reminder settings.
    pub reminders: ReminderConfig,
}

/// Batch sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum individuals synced at the same time.
    pub max_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file (None = `data_dir()/roster.db`).
    pub database_path: Option<PathBuf>,
}

/// Inactivity reminder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Trailing window, in days, that must contain an accepted submission.
    pub window_days: u32,
    /// Message subject line.
    pub subject: String,
    /// Closing line of the message body.
    pub signature: String,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            subject: "Reminder: Stay Active on Codeforces".to_owned(),
            signature: "Student Progress Management System".to_owned(),
        }
    }
}

impl RosterConfig {
    /// Check every section for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] naming the offending setting, or
    /// [`RosterError::Client`] for client settings.
    pub fn validate(&self) -> Result<()> {
        self.client.validate()?;
        if self.sync.max_concurrency == 0 {
            return Err(RosterError::Config(
                "sync.max_concurrency must be at least 1".into(),
            ));
        }
        if self.reminders.window_days == 0 {
            return Err(RosterError::Config(
                "reminders.window_days must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Database path, falling back to the platform data directory.
    pub fn database_path(&self) -> PathBuf {
        self.store
            .database_path
            .clone()
            .unwrap_or_else(crate::dirs::database_file)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| RosterError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| RosterError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::dirs::config_file()
    }
}
