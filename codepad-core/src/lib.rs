//! `Codepad` Core Library
//!
//! This crate provides the tab and pane lifecycle of the `Codepad` editor:
//! which documents are open, which one is visible, which view adapter
//! renders each one, and how every adapter releases what it acquired.
//!
//! # Crate Structure
//!
//! - [`manager`] - Tab Manager: ordered tabs, the active pointer, view lifecycle
//! - [`view`] - View adapters (editor, split, terminal, assistant, image/PDF viewer)
//! - [`registry`] - Tab and pane identities, live views and backend sessions
//! - [`outline`] - Symbol extraction and the outline panel
//! - [`workspace`] - File open/save flows over the async services
//! - [`host`] / [`backend`] / [`services`] - Contracts toward the host and native bridge
//! - [`config`] - Settings and persistence
//! - [`testing`] - Fakes for every host and backend contract

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod manager;
pub mod model;
pub mod outline;
pub mod registry;
pub mod services;
pub mod testing;
pub mod tracing;
pub mod view;
pub mod workspace;

// =============================================================================
// Convenience re-exports
// =============================================================================

pub use config::{AppSettings, ConfigManager};
pub use error::{
    BackendError, BackendResult, ConfigError, ConfigResult, ServiceError, ServiceResult,
    ValidationError, ViewError, ViewResult, WorkspaceError, WorkspaceResult,
};
pub use format::{FormatOutcome, format_code};
pub use host::HostContext;
pub use manager::TabManager;
pub use model::{ContentKind, Document, Language, NewTab, Orientation, Tab, TabId, TabUpdate};
pub use outline::{OutlinePanel, Symbol, SymbolKind, parse_symbols};
pub use registry::{BackendSession, SessionRegistry, ViewKind};
pub use tracing::{TracingConfig, TracingLevel, init_tracing, span_names};
pub use view::{TabView, ViewAdapter};
pub use workspace::{SaveOutcome, Workspace};
