//! Terminal session backend contract

use std::rc::Rc;

use crate::error::BackendResult;
use crate::model::{SubscriptionId, TabId};

/// Output chunk handler.
pub type OutputHandler = Rc<dyn Fn(&str)>;

/// Exit code handler.
pub type ExitHandler = Rc<dyn Fn(i32)>;

/// Backend-managed pseudo-terminal sessions keyed by tab id.
///
/// Output and exit notifications arrive on per-tab push channels. A view
/// subscribes for as long as it is alive and unsubscribes on destroy.
pub trait TerminalBackend {
    /// Starts a session. Fails if one already exists for the tab.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::SessionExists`](crate::error::BackendError::SessionExists)
    /// or a bridge failure.
    fn start(&self, tab: TabId) -> BackendResult<()>;

    /// Forwards keystrokes verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the bridge fails.
    fn write(&self, tab: TabId, data: &str) -> BackendResult<()>;

    /// Resizes the session. Ignored for sessions that are not running.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge fails.
    fn resize(&self, tab: TabId, cols: u16, rows: u16) -> BackendResult<()>;

    /// Terminates the session. A missing session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the bridge fails.
    fn stop(&self, tab: TabId) -> BackendResult<()>;

    /// Subscribes to output chunks for the tab
    fn subscribe_output(&self, tab: TabId, handler: OutputHandler) -> SubscriptionId;

    /// Subscribes to the exit notification for the tab
    fn subscribe_exit(&self, tab: TabId, handler: ExitHandler) -> SubscriptionId;

    /// Drops a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Trailer written when the backend reports that the process ended.
#[must_use]
pub fn exit_trailer(code: i32) -> String {
    format!("\r\n\x1b[90m[Process exited with code {code}]\x1b[0m\r\n")
}

/// Error line written when the session cannot be started.
#[must_use]
pub fn start_failure_line(error: &str) -> String {
    format!("\x1b[31mFailed to start terminal: {error}\x1b[0m\r\n")
}
