//! Tab strip and workspace observer that record what they were told

use std::cell::{Cell, RefCell};

use crate::host::{ExternalAction, TabStrip, WorkspaceObserver};
use crate::model::TabId;

#[derive(Debug, Clone)]
struct Header {
    id: TabId,
    title: String,
    active: bool,
}

/// Tab strip keeping its headers in order.
#[derive(Debug, Default)]
pub struct RecordingTabStrip {
    headers: RefCell<Vec<Header>>,
}

impl RecordingTabStrip {
    /// Creates an empty strip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Displayed title of a tab's header.
    pub fn title(&self, id: TabId) -> Option<String> {
        self.headers
            .borrow()
            .iter()
            .find(|h| h.id == id)
            .map(|h| h.title.clone())
    }

    /// Header ids in strip order.
    pub fn header_ids(&self) -> Vec<TabId> {
        self.headers.borrow().iter().map(|h| h.id).collect()
    }

    /// Headers currently marked active.
    pub fn active_ids(&self) -> Vec<TabId> {
        self.headers
            .borrow()
            .iter()
            .filter(|h| h.active)
            .map(|h| h.id)
            .collect()
    }
}

impl TabStrip for RecordingTabStrip {
    fn add_header(&self, id: TabId, title: &str) {
        self.headers.borrow_mut().push(Header {
            id,
            title: title.to_owned(),
            active: false,
        });
    }

    fn remove_header(&self, id: TabId) {
        self.headers.borrow_mut().retain(|h| h.id != id);
    }

    fn set_title(&self, id: TabId, title: &str) {
        if let Some(header) = self.headers.borrow_mut().iter_mut().find(|h| h.id == id) {
            title.clone_into(&mut header.title);
        }
    }

    fn set_active(&self, id: TabId, active: bool) {
        if let Some(header) = self.headers.borrow_mut().iter_mut().find(|h| h.id == id) {
            header.active = active;
        }
    }
}

/// Observer that keeps every notification.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    activations: RefCell<Vec<TabId>>,
    tabs_changed: Cell<usize>,
    content_changes: RefCell<Vec<TabId>>,
    cursor_moves: RefCell<Vec<(usize, usize)>>,
    actions: RefCell<Vec<ExternalAction>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activated tabs, in order.
    pub fn activations(&self) -> Vec<TabId> {
        self.activations.borrow().clone()
    }

    /// Number of tab list notifications.
    pub fn tabs_changed_count(&self) -> usize {
        self.tabs_changed.get()
    }

    /// Tabs whose content changed, in order.
    pub fn content_changes(&self) -> Vec<TabId> {
        self.content_changes.borrow().clone()
    }

    /// Reported cursor positions.
    pub fn cursor_moves(&self) -> Vec<(usize, usize)> {
        self.cursor_moves.borrow().clone()
    }

    /// Requested external actions.
    pub fn actions(&self) -> Vec<ExternalAction> {
        self.actions.borrow().clone()
    }
}

impl WorkspaceObserver for RecordingObserver {
    fn tab_activated(&self, id: TabId) {
        self.activations.borrow_mut().push(id);
    }

    fn tabs_changed(&self) {
        self.tabs_changed.set(self.tabs_changed.get() + 1);
    }

    fn content_changed(&self, id: TabId) {
        self.content_changes.borrow_mut().push(id);
    }

    fn cursor_moved(&self, line: usize, column: usize) {
        self.cursor_moves.borrow_mut().push((line, column));
    }

    fn external_action(&self, action: ExternalAction) {
        self.actions.borrow_mut().push(action);
    }
}
