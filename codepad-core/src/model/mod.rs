//! Core data model: tab records, panes, content kinds and identifiers

pub mod file_type;
mod kind;
mod tab;
mod types;

pub use file_type::{content_kind_for, data_uri, filename_from_path, mime_type_for};
pub use kind::{ContentKind, Language, Orientation};
pub use tab::{Document, NewTab, Pane, SharedDocument, Tab, TabUpdate};
pub use types::{ListenerId, PaneId, SubscriptionId, SurfaceId, TabId, TimerId};
