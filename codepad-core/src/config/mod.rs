//! Configuration management for `Codepad`
//!
//! This module provides the `ConfigManager` for loading and saving
//! the settings file in TOML format.

mod manager;
pub mod settings;

pub use manager::{APP_DIR_NAME, CONFIG_FILE_NAME, ConfigManager};
pub use settings::{
    AppSettings, AssistantSettings, EditorSettings, LoggingSettings, OutlineSettings,
    RecentFiles, SearchSettings, TabSettings, TerminalSettings,
};
