//! Session registry for `Codepad`
//!
//! The `SessionRegistry` issues identities for tabs and panes and keeps the
//! bookkeeping of which view instances are alive and which backend sessions
//! they own. Issued ids are remembered for the lifetime of the registry so
//! an id is never handed out twice.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::model::{PaneId, TabId};

/// Kind of view instance tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Plain text editor
    Editor,
    /// Two-pane split editor
    Split,
    /// Terminal panel
    Terminal,
    /// Assistant chat panel
    Assistant,
    /// Image or PDF viewer
    Viewer,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Editor => "editor",
            Self::Split => "split",
            Self::Terminal => "terminal",
            Self::Assistant => "assistant",
            Self::Viewer => "viewer",
        };
        f.write_str(name)
    }
}

/// Kind of backend session owned by a view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendSession {
    /// Pseudo-terminal session keyed by tab id
    Terminal,
    /// Streaming assistant query scoped to the tab
    AssistantStream,
}

/// Identity generation and live-instance bookkeeping.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    issued_tabs: HashSet<TabId>,
    issued_panes: HashSet<PaneId>,
    live_views: HashMap<TabId, ViewKind>,
    sessions: HashMap<TabId, HashSet<BackendSession>>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a tab id that has never been issued before.
    pub fn next_tab_id(&mut self) -> TabId {
        loop {
            let id = TabId::new();
            if self.issued_tabs.insert(id) {
                return id;
            }
        }
    }

    /// Issues a pane id that has never been issued before.
    pub fn next_pane_id(&mut self) -> PaneId {
        loop {
            let id = PaneId::new();
            if self.issued_panes.insert(id) {
                return id;
            }
        }
    }

    /// Returns true if the tab id was issued by this registry.
    #[must_use]
    pub fn was_issued(&self, id: TabId) -> bool {
        self.issued_tabs.contains(&id)
    }

    /// Number of tab ids issued so far.
    #[must_use]
    pub fn issued_tab_count(&self) -> usize {
        self.issued_tabs.len()
    }

    /// Records a live view instance for a tab.
    ///
    /// Returns the previously registered kind if the tab already had one,
    /// which indicates a leaked adapter.
    pub fn register_view(&mut self, id: TabId, kind: ViewKind) -> Option<ViewKind> {
        let previous = self.live_views.insert(id, kind);
        if let Some(previous) = previous {
            tracing::warn!(tab_id = %id, %previous, %kind, "View registered twice for tab");
        }
        previous
    }

    /// Forgets the view instance for a tab.
    pub fn unregister_view(&mut self, id: TabId) -> Option<ViewKind> {
        self.live_views.remove(&id)
    }

    /// Returns the live view kind for a tab.
    #[must_use]
    pub fn view_kind(&self, id: TabId) -> Option<ViewKind> {
        self.live_views.get(&id).copied()
    }

    /// Number of live view instances.
    #[must_use]
    pub fn live_view_count(&self) -> usize {
        self.live_views.len()
    }

    /// Records a backend session opened by the tab's view.
    pub fn record_session(&mut self, id: TabId, session: BackendSession) {
        self.sessions.entry(id).or_default().insert(session);
    }

    /// Releases a backend session. Returns false if it was not recorded.
    pub fn release_session(&mut self, id: TabId, session: BackendSession) -> bool {
        let Some(owned) = self.sessions.get_mut(&id) else {
            return false;
        };
        let removed = owned.remove(&session);
        if owned.is_empty() {
            self.sessions.remove(&id);
        }
        removed
    }

    /// Returns true if the tab's view owns the given backend session.
    #[must_use]
    pub fn has_session(&self, id: TabId, session: BackendSession) -> bool {
        self.sessions
            .get(&id)
            .is_some_and(|owned| owned.contains(&session))
    }

    /// Total number of open backend sessions.
    #[must_use]
    pub fn open_session_count(&self) -> usize {
        self.sessions.values().map(HashSet::len).sum()
    }
}
