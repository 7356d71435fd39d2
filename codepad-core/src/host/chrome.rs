//! Contracts toward the window chrome: tab headers and workspace notifications

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::model::{Language, TabId};

/// Tab header affordances in the tab strip.
pub trait TabStrip {
    /// Appends a header for a new tab
    fn add_header(&self, id: TabId, title: &str);

    /// Removes a tab's header
    fn remove_header(&self, id: TabId);

    /// Updates the displayed title
    fn set_title(&self, id: TabId, title: &str);

    /// Marks a header as active or inactive
    fn set_active(&self, id: TabId, active: bool);
}

/// Cross-cutting action requested from inside a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalAction {
    /// Ask the assistant to explain a code selection
    AskAssistant {
        /// Selected text
        selection: String,
        /// Language of the source document
        language: Language,
    },
    /// Pick a file to load into one pane of the visible split view
    OpenFileInPane {
        /// Pane index
        pane: usize,
    },
}

/// Notifications to the chrome layer so it can refresh affordances.
///
/// Notifications raised while a [`NotificationHold`] is alive are delivered
/// when the last hold drops, after the Tab Manager borrow is released.
pub trait WorkspaceObserver {
    /// A tab became the visible one
    fn tab_activated(&self, _id: TabId) {}

    /// Tabs were added, removed or renamed
    fn tabs_changed(&self) {}

    /// A tab's content or dirty state changed
    fn content_changed(&self, _id: TabId) {}

    /// Cursor moved in the focused editor (1-based)
    fn cursor_moved(&self, _line: usize, _column: usize) {}

    /// A view requested a cross-cutting action
    fn external_action(&self, _action: ExternalAction) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl WorkspaceObserver for NoopObserver {}

#[derive(Debug, Clone)]
enum Notice {
    Activated(TabId),
    TabsChanged,
    ContentChanged(TabId),
    CursorMoved(usize, usize),
    Action(ExternalAction),
}

/// Observer wrapper that defers delivery while held.
pub struct NotificationQueue {
    target: Rc<dyn WorkspaceObserver>,
    holds: Cell<usize>,
    pending: RefCell<Vec<Notice>>,
}

impl NotificationQueue {
    /// Wraps the observer that finally receives the notifications.
    #[must_use]
    pub fn new(target: Rc<dyn WorkspaceObserver>) -> Rc<Self> {
        Rc::new(Self {
            target,
            holds: Cell::new(0),
            pending: RefCell::new(Vec::new()),
        })
    }

    /// Defers delivery until the returned guard, and every other live
    /// hold, is dropped.
    #[must_use]
    pub fn hold(self: &Rc<Self>) -> NotificationHold {
        self.holds.set(self.holds.get() + 1);
        NotificationHold {
            queue: Rc::clone(self),
        }
    }

    /// Number of notifications waiting for delivery.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    fn push(&self, notice: Notice) {
        if self.holds.get() > 0 {
            self.pending.borrow_mut().push(notice);
        } else {
            self.dispatch(notice);
        }
    }

    fn dispatch(&self, notice: Notice) {
        match notice {
            Notice::Activated(id) => self.target.tab_activated(id),
            Notice::TabsChanged => self.target.tabs_changed(),
            Notice::ContentChanged(id) => self.target.content_changed(id),
            Notice::CursorMoved(line, column) => self.target.cursor_moved(line, column),
            Notice::Action(action) => self.target.external_action(action),
        }
    }

    fn release(&self) {
        let holds = self.holds.get().saturating_sub(1);
        self.holds.set(holds);
        if holds > 0 {
            return;
        }
        // Drained before dispatch; the observer may raise new notifications
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        for notice in batch {
            self.dispatch(notice);
        }
    }
}

impl WorkspaceObserver for NotificationQueue {
    fn tab_activated(&self, id: TabId) {
        self.push(Notice::Activated(id));
    }

    fn tabs_changed(&self) {
        self.push(Notice::TabsChanged);
    }

    fn content_changed(&self, id: TabId) {
        self.push(Notice::ContentChanged(id));
    }

    fn cursor_moved(&self, line: usize, column: usize) {
        self.push(Notice::CursorMoved(line, column));
    }

    fn external_action(&self, action: ExternalAction) {
        self.push(Notice::Action(action));
    }
}

/// Guard returned by [`NotificationQueue::hold`].
pub struct NotificationHold {
    queue: Rc<NotificationQueue>,
}

impl Drop for NotificationHold {
    fn drop(&mut self) {
        self.queue.release();
    }
}
