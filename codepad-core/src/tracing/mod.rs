//! Tracing integration for structured logging
//!
//! This module initializes the `tracing` subscriber for `Codepad` and defines
//! the span and field names used for tab lifecycle, terminal sessions,
//! assistant queries, file flows and configuration.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingSettings;

/// Global flag indicating whether tracing has been initialized
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration the subscriber was installed with
static TRACING_CONFIG: OnceLock<TracingConfig> = OnceLock::new();

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to install the subscriber
    #[error("Failed to initialize tracing: {0}")]
    InitializationFailed(String),

    /// The custom filter directive could not be parsed
    #[error("Invalid filter directive: {0}")]
    InvalidFilter(String),

    /// Tracing already initialized
    #[error("Tracing has already been initialized")]
    AlreadyInitialized,

    /// Failed to create log file
    #[error("Failed to create log file: {0}")]
    FileCreationFailed(String),
}

/// Result type for tracing operations
pub type TracingResult<T> = Result<T, TracingError>;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Errors, warnings and info (default)
    #[default]
    Info,
    /// Everything above plus debug messages
    Debug,
    /// All messages
    Trace,
}

impl TracingLevel {
    /// Converts to the tracing crate's level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Output destination for log lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error
    #[default]
    Stderr,
    /// A log file, truncated on startup
    File {
        /// Path to the log file
        path: PathBuf,
    },
}

/// Configuration for tracing initialization
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Log level for `codepad` targets
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Whether to print thread ids
    pub thread_ids: bool,
    /// Custom filter string (overrides level if set)
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Creates a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives a configuration from the persisted logging settings.
    ///
    /// Unknown level names fall back to `info`.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let level = settings.level.parse().unwrap_or_default();
        let output = settings
            .file
            .clone()
            .map_or(TracingOutput::Stderr, |path| TracingOutput::File { path });
        Self {
            level,
            output,
            ..Self::default()
        }
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Enables or disables thread ids in log lines
    #[must_use]
    pub const fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Sets a custom filter string
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the env filter for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::InvalidFilter`] if the custom filter is malformed.
    pub fn env_filter(&self) -> TracingResult<EnvFilter> {
        match &self.filter {
            Some(custom) => {
                EnvFilter::try_new(custom).map_err(|e| TracingError::InvalidFilter(e.to_string()))
            }
            None => Ok(EnvFilter::try_new(format!("codepad={}", self.level))
                .unwrap_or_else(|_| EnvFilter::new("info"))),
        }
    }

    fn make_writer(&self) -> TracingResult<(BoxMakeWriter, bool)> {
        match &self.output {
            TracingOutput::Stdout => Ok((BoxMakeWriter::new(std::io::stdout), true)),
            TracingOutput::Stderr => Ok((BoxMakeWriter::new(std::io::stderr), true)),
            TracingOutput::File { path } => {
                let file = std::fs::File::create(path)
                    .map_err(|e| TracingError::FileCreationFailed(e.to_string()))?;
                Ok((BoxMakeWriter::new(std::sync::Mutex::new(file)), false))
            }
        }
    }
}

/// Installs the global subscriber.
///
/// Call once at startup; later calls fail with
/// [`TracingError::AlreadyInitialized`].
///
/// # Errors
///
/// Returns an error if:
/// - Tracing has already been initialized
/// - The custom filter is invalid
/// - File output is configured but the file cannot be created
/// - Another global subscriber is already installed
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let installed = install(config);
    if installed.is_err() {
        TRACING_INITIALIZED.store(false, Ordering::SeqCst);
    }
    installed?;

    let _ = TRACING_CONFIG.set(config.clone());
    tracing::info!(level = %config.level, output = ?config.output, "Tracing initialized");
    Ok(())
}

fn install(config: &TracingConfig) -> TracingResult<()> {
    let filter = config.env_filter()?;
    let (writer, ansi) = config.make_writer()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(config.thread_ids)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))
}

/// Checks if tracing has been initialized
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Gets the configuration the subscriber was installed with
#[must_use]
pub fn get_tracing_config() -> Option<&'static TracingConfig> {
    TRACING_CONFIG.get()
}

/// Standard span names for `Codepad` operations
pub mod span_names {
    /// Tab creation span
    pub const TAB_CREATE: &str = "tab.create";
    /// Tab close span
    pub const TAB_CLOSE: &str = "tab.close";
    /// Tab update span
    pub const TAB_UPDATE: &str = "tab.update";
    /// Terminal session start span
    pub const TERMINAL_START: &str = "terminal.start";
    /// Terminal teardown span
    pub const TERMINAL_DESTROY: &str = "terminal.destroy";
    /// Assistant query span
    pub const ASSISTANT_QUERY: &str = "assistant.query";
    /// Outline parse span
    pub const OUTLINE_PARSE: &str = "outline.parse";
    /// File open span
    pub const FILE_OPEN: &str = "file.open";
    /// File save span
    pub const FILE_SAVE: &str = "file.save";
    /// Search execution span
    pub const SEARCH_EXECUTE: &str = "search.execute";
    /// Configuration load span
    pub const CONFIG_LOAD: &str = "config.load";
    /// Configuration save span
    pub const CONFIG_SAVE: &str = "config.save";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("error".parse::<TracingLevel>(), Ok(TracingLevel::Error));
        assert_eq!("WARN".parse::<TracingLevel>(), Ok(TracingLevel::Warn));
        assert_eq!("warning".parse::<TracingLevel>(), Ok(TracingLevel::Warn));
        assert_eq!("Info".parse::<TracingLevel>(), Ok(TracingLevel::Info));
        assert_eq!("trace".parse::<TracingLevel>(), Ok(TracingLevel::Trace));
        assert!("verbose".parse::<TracingLevel>().is_err());
    }

    #[test]
    fn level_display_round_trips() {
        for level in [
            TracingLevel::Error,
            TracingLevel::Warn,
            TracingLevel::Info,
            TracingLevel::Debug,
            TracingLevel::Trace,
        ] {
            assert_eq!(level.to_string().parse::<TracingLevel>(), Ok(level));
        }
    }

    #[test]
    fn config_from_settings_uses_file_output() {
        let settings = LoggingSettings {
            level: "debug".into(),
            file: Some(PathBuf::from("/tmp/codepad.log")),
        };
        let config = TracingConfig::from_settings(&settings);
        assert_eq!(config.level, TracingLevel::Debug);
        assert_eq!(
            config.output,
            TracingOutput::File {
                path: PathBuf::from("/tmp/codepad.log")
            }
        );
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let settings = LoggingSettings {
            level: "loud".into(),
            file: None,
        };
        let config = TracingConfig::from_settings(&settings);
        assert_eq!(config.level, TracingLevel::Info);
        assert_eq!(config.output, TracingOutput::Stderr);
    }

    #[test]
    fn malformed_custom_filter_is_rejected() {
        let config = TracingConfig::new().with_filter("codepad=[");
        assert!(matches!(
            config.env_filter(),
            Err(TracingError::InvalidFilter(_))
        ));
    }

    #[test]
    fn builder_sets_fields() {
        let config = TracingConfig::new()
            .with_level(TracingLevel::Debug)
            .with_output(TracingOutput::Stdout)
            .with_thread_ids(true)
            .with_filter("codepad=debug,tokio=warn");
        assert_eq!(config.level, TracingLevel::Debug);
        assert_eq!(config.output, TracingOutput::Stdout);
        assert!(config.thread_ids);
        assert_eq!(config.filter.as_deref(), Some("codepad=debug,tokio=warn"));
    }
}
