use crate::{AppError, AppResult, config::Config};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};

/// The config file plus what was last read from or written to it.
///
/// A file that exists but cannot be loaded is never overwritten silently:
/// autosave is skipped, and an explicit save first copies it to
/// `config.toml.bak`.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
    loaded: bool,
}

impl ConfigStore {
    /// Loads `path`, falling back to defaults on failure.
    ///
    /// The load error, if any, is returned alongside the store so the caller
    /// can report it once logging is up.
    pub fn open(path: PathBuf) -> (Self, Option<AppError>) {
        match Config::load_from(&path) {
            Ok(config) => (
                Self {
                    path,
                    config,
                    loaded: true,
                },
                None,
            ),
            Err(e) => (
                Self {
                    path,
                    config: Config::default(),
                    loaded: false,
                },
                Some(e),
            ),
        }
    }

    /// Last loaded or saved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Location of the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the in-memory state came from (or has since been written to) the file.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Writes `config`, backing up an unreadable file first.
    #[track_caller]
    #[instrument(skip(self, config), fields(path = ?self.path))]
    pub fn save(&mut self, config: Config) -> AppResult<()> {
        if !self.loaded {
            self.back_up()?;
        }

        config.save_to(&self.path)?;
        self.config = config;
        self.loaded = true;

        Ok(())
    }

    /// Saves on exit unless the file could not be loaded at startup.
    ///
    /// Returns `Ok(false)` when the save was skipped.
    #[track_caller]
    pub fn autosave(&mut self, config: Config) -> AppResult<bool> {
        if !self.loaded {
            warn!(path = ?self.path, "Config was not loaded, autosave skipped");
            return Ok(false);
        }

        self.save(config)?;
        Ok(true)
    }

    /// Reads the file again without changing the store.
    #[track_caller]
    pub fn read(&self) -> AppResult<Config> {
        Config::load_from(&self.path)
    }

    /// Adopts a configuration returned by [`read`](Self::read).
    pub fn replace(&mut self, config: Config) {
        self.config = config;
        self.loaded = true;
    }

    #[track_caller]
    fn back_up(&self) -> AppResult<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let backup = self.path.with_extension("toml.bak");
        fs::copy(&self.path, &backup).map_err(|e| AppError::PersistenceFailure {
            reason: format!("Failed to back up unreadable config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(backup = ?backup, "Unreadable config backed up");

        Ok(())
    }
}
