//! Error types for `Codepad`
//!
//! This module defines the error taxonomy used throughout the core:
//! backend-call failures, local input validation, view adapter failures,
//! async service failures and configuration persistence.

use thiserror::Error;

use crate::model::TabId;

/// Errors raised by the terminal and assistant backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A session is already running for the tab
    #[error("session already exists for {0}")]
    SessionExists(TabId),

    /// No session is known for the tab
    #[error("session not found for {0}")]
    SessionNotFound(TabId),

    /// The backend refused the request
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// The backend bridge could not be reached
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// User-input validation failures, rejected before any backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Search query was empty or whitespace only
    #[error("search query must not be empty")]
    EmptyQuery,

    /// Assistant prompt was empty or whitespace only
    #[error("prompt must not be empty")]
    EmptyPrompt,

    /// Binary content cannot be loaded into a split pane
    #[error("{0} files cannot be opened in a split pane")]
    UnsupportedPaneContent(String),

    /// Split views have exactly two panes
    #[error("pane index {0} is out of range")]
    PaneIndexOutOfRange(usize),
}

/// Errors raised by view adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The adapter has already been torn down
    #[error("view for {0} has been destroyed")]
    Destroyed(TabId),

    /// The adapter is waiting for a streamed response
    #[error("a request is already in progress")]
    Busy,

    /// Local validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for view adapter operations
pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// Failure reported by an async service through its `error` field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The service returned an error message
    #[error("{0}")]
    Failed(String),

    /// The service returned neither data nor an error
    #[error("service returned an empty response")]
    EmptyResponse,
}

/// Result type for service calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors raised by the workspace flows that combine services and tabs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// There is no active tab to act on
    #[error("no active tab")]
    NoActiveTab,

    /// The tab exists but has no split view
    #[error("{0} is not a split view")]
    NotSplit(TabId),

    /// The tab limit was reached
    #[error("maximum number of tabs reached")]
    TabLimitReached,

    /// A service call failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Local validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A view adapter failed
    #[error(transparent)]
    View(#[from] ViewError),
}

/// Result type for workspace flows
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no configuration directory
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The settings could not be serialized
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
