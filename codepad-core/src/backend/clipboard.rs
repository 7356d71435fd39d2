//! Host clipboard bridge
//!
//! The embedded web view has no direct clipboard access, so copy and paste
//! go through the native bridge.

use crate::error::BackendResult;

/// Text clipboard provided by the native host.
pub trait ClipboardBridge {
    /// Reads the clipboard text.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge call fails.
    fn get_text(&self) -> BackendResult<String>;

    /// Replaces the clipboard text.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge call fails.
    fn set_text(&self, text: &str) -> BackendResult<()>;
}
