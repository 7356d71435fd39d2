//! Document-level listener registrations
//!
//! Every adapter registers its own listeners and removes exactly those in
//! its teardown path. [`ListenerSet`] tracks the ids an adapter added.

use std::rc::Rc;

use crate::model::ListenerId;

use super::surface::Point;

/// Kind of document-level event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer click anywhere in the document
    Click,
    /// Key press anywhere in the document
    KeyDown,
    /// Pointer movement, used while dragging
    PointerMove,
    /// Pointer release, used to end a drag
    PointerUp,
}

/// Event delivered to a document-level listener.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// Click at a position
    Click(Point),
    /// Key press with the key name (`"Escape"`, `"a"`, ...)
    KeyDown(String),
    /// Pointer moved to a position
    PointerMove(Point),
    /// Pointer released at a position
    PointerUp(Point),
}

impl DocumentEvent {
    /// Returns the listener kind this event is delivered to.
    #[must_use]
    pub const fn kind(&self) -> ListenerKind {
        match self {
            Self::Click(_) => ListenerKind::Click,
            Self::KeyDown(_) => ListenerKind::KeyDown,
            Self::PointerMove(_) => ListenerKind::PointerMove,
            Self::PointerUp(_) => ListenerKind::PointerUp,
        }
    }

    /// Returns true for an Escape key press.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        matches!(self, Self::KeyDown(key) if key == "Escape")
    }
}

/// Listener callback.
pub type DocumentHandler = Rc<dyn Fn(&DocumentEvent)>;

/// Host registry of document-level listeners.
pub trait DocumentListeners {
    /// Adds a listener and returns its registration id
    fn add(&self, kind: ListenerKind, handler: DocumentHandler) -> ListenerId;

    /// Removes a listener. Returns false if the id was unknown.
    fn remove(&self, id: ListenerId) -> bool;
}

/// Listener ids added by one adapter.
pub struct ListenerSet {
    host: Rc<dyn DocumentListeners>,
    ids: Vec<ListenerId>,
}

impl ListenerSet {
    /// Creates an empty set bound to the host registry.
    #[must_use]
    pub fn new(host: Rc<dyn DocumentListeners>) -> Self {
        Self {
            host,
            ids: Vec::new(),
        }
    }

    /// Registers a listener and remembers its id.
    pub fn add(&mut self, kind: ListenerKind, handler: DocumentHandler) -> ListenerId {
        let id = self.host.add(kind, handler);
        self.ids.push(id);
        id
    }

    /// Number of registrations still held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Removes every registration. Unknown ids are logged and skipped.
    pub fn remove_all(&mut self) -> usize {
        let mut removed = 0;
        for id in self.ids.drain(..) {
            if self.host.remove(id) {
                removed += 1;
            } else {
                tracing::debug!(listener = id.0, "Listener already removed");
            }
        }
        removed
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        if !self.ids.is_empty() {
            tracing::warn!(count = self.ids.len(), "Dropping listener set with live registrations");
            self.remove_all();
        }
    }
}
