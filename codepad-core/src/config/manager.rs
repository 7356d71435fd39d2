//! Loading and saving of the settings file

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::tracing::span_names;

use super::settings::AppSettings;

/// Settings file name inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "codepad";

/// Reads and writes [`AppSettings`] as TOML.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if the platform has none.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Creates a manager rooted at a custom directory.
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Returns the configuration directory.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the path of the settings file.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn try_load_settings(&self) -> ConfigResult<AppSettings> {
        let content = fs::read_to_string(self.settings_path())?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads settings, falling back to defaults when the file is missing
    /// or cannot be parsed.
    #[must_use]
    pub fn load_settings(&self) -> AppSettings {
        let _span = tracing::debug_span!(span_names::CONFIG_LOAD).entered();
        let path = self.settings_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return AppSettings::default();
        }
        match self.try_load_settings() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to load settings, using defaults");
                AppSettings::default()
            }
        }
    }

    /// Writes the settings file, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        let _span = tracing::debug_span!(span_names::CONFIG_SAVE).entered();
        fs::create_dir_all(&self.config_dir)?;
        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(self.settings_path(), content)?;
        tracing::debug!(path = %self.settings_path().display(), "Settings saved");
        Ok(())
    }
}
