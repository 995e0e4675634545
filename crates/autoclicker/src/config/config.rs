//! Configuration and sequence persistence for autoclicker.
//!
//! One TOML file holds the recorded actions, the hotkey binding, the
//! initial run settings and logging options. Writes are atomic.

use crate::{
    AppError, AppResult,
    config::{LoggingConfig, PlaybackConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use autoclicker_core::{Action, ActionSequence, HotkeyBinding};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Start/stop playback keys.
    #[serde(default)]
    pub hotkeys: HotkeyBinding,
    /// Initial run settings.
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Logging options.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Recorded actions in playback order.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Config {
    /// Load configuration from `path`, creating a default file if absent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the file exists but cannot be read
    /// or parsed, or if the default file cannot be written.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!(config_path = ?path, "No config found, creating default");
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| AppError::PersistenceFailure {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| AppError::PersistenceFailure {
                reason: format!("Failed to parse config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        config.hotkeys = config.hotkeys.normalized();

        info!(
            config_path = ?path,
            actions = config.actions.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::PersistenceFailure {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| AppError::PersistenceFailure {
                    reason: format!("Failed to create config directory: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                debug!(config_dir = ?parent, "Created config directory");
            }
        }

        // Atomic write: write to temp file then rename
        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::PersistenceFailure {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::PersistenceFailure {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::PersistenceFailure {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::PersistenceFailure {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(
            config_path = ?path,
            actions = self.actions.len(),
            "Configuration saved (atomic write)"
        );

        Ok(())
    }

    /// Recorded actions as a sequence.
    pub fn sequence(&self) -> ActionSequence {
        ActionSequence::from_serializable(self.actions.clone())
    }

    /// Path of the config file in the platform config directory.
    #[track_caller]
    pub fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Directory for rolling log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.data_dir().join("logs"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "autoclicker", "Autoclicker").ok_or_else(|| {
            AppError::PersistenceFailure {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
