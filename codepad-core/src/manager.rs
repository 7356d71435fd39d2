//! Tab Manager
//!
//! Owns the ordered tab list, the single active-tab pointer and the map
//! from tab id to view adapter. Views are created lazily on first
//! activation and hidden, not destroyed, when another tab is shown.
//!
//! Callbacks handed to views capture the tab's document, the tab strip and
//! the workspace observer, never the manager itself, so a view event can
//! never re-enter the manager while it is mid-operation.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::{AppSettings, TabSettings};
use crate::host::{HostContext, NotificationHold, NotificationQueue, TabStrip, WorkspaceObserver};
use crate::model::{Document, NewTab, Tab, TabId, TabUpdate};
use crate::registry::SessionRegistry;
use crate::tracing::span_names;
use crate::view::{TabView, ViewAdapter, ViewCallbacks, ViewContext, create_view};

/// Orchestrates tab creation, activation, update and teardown.
pub struct TabManager {
    tabs: Vec<Tab>,
    active_tab_id: Option<TabId>,
    views: HashMap<TabId, TabView>,
    ctx: ViewContext,
    strip: Rc<dyn TabStrip>,
    observer: Rc<NotificationQueue>,
    settings: TabSettings,
    next_untitled: usize,
}

impl TabManager {
    /// Creates a manager holding one fresh scratch tab.
    #[must_use]
    pub fn new(
        host: HostContext,
        strip: Rc<dyn TabStrip>,
        observer: Rc<dyn WorkspaceObserver>,
        settings: &AppSettings,
    ) -> Self {
        let ctx = ViewContext {
            host,
            registry: Rc::new(RefCell::new(SessionRegistry::new())),
            editor: settings.editor.clone(),
            terminal: settings.terminal.clone(),
            assistant: settings.assistant.clone(),
        };
        let mut manager = Self {
            tabs: Vec::new(),
            active_tab_id: None,
            views: HashMap::new(),
            ctx,
            strip,
            observer: NotificationQueue::new(observer),
            settings: settings.tabs.clone(),
            next_untitled: 1,
        };
        manager.create_tab(NewTab::scratch());
        manager
    }

    /// Identity and session bookkeeping shared with the views.
    #[must_use]
    pub fn registry(&self) -> Rc<RefCell<SessionRegistry>> {
        Rc::clone(&self.ctx.registry)
    }

    /// Holds observer notifications back until the guard drops.
    ///
    /// Take the hold before borrowing a shared manager mutably and drop it
    /// after the borrow, so the observer may call back into the manager.
    #[must_use]
    pub fn hold_notifications(&self) -> NotificationHold {
        self.observer.hold()
    }

    /// Maximum number of open tabs.
    #[must_use]
    pub const fn max_tabs(&self) -> usize {
        self.settings.max_tabs
    }

    fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    fn resolve_title(&mut self, title: Option<String>) -> String {
        match title {
            None => self.settings.default_tab_name.clone(),
            Some(title) if title.is_empty() => {
                let title = format!("Untitled-{}", self.next_untitled);
                self.next_untitled += 1;
                title
            }
            Some(title) => title,
        }
    }

    /// Creates a tab and makes it active.
    ///
    /// Returns `None` without side effects when the tab limit is reached.
    /// A missing title becomes the default tab name, an empty one an
    /// `Untitled-N` fallback; missing content becomes the scratch content.
    pub fn create_tab(&mut self, new: NewTab) -> Option<TabId> {
        if self.tabs.len() >= self.settings.max_tabs {
            tracing::warn!(max_tabs = self.settings.max_tabs, "Maximum tabs reached");
            return None;
        }

        let id = self.ctx.registry.borrow_mut().next_tab_id();
        let _span = tracing::info_span!(span_names::TAB_CREATE, tab_id = %id, kind = %new.kind)
            .entered();

        let title = self.resolve_title(new.title);
        let content = new
            .content
            .unwrap_or_else(|| self.settings.default_content.clone());
        let mut document = Document::new(title, content, new.kind);
        document.path = new.path;
        let tab = Tab::new(id, document, new.orientation);

        self.strip.add_header(id, &tab.display_title());
        self.tabs.push(tab);
        tracing::debug!(count = self.tabs.len(), "Tab created");
        self.observer.tabs_changed();
        self.set_active_tab(id);
        Some(id)
    }

    fn callbacks_for(&self, tab: &Tab) -> ViewCallbacks {
        let id = tab.id();
        let doc = tab.shared_document();
        let strip = Rc::clone(&self.strip);
        let on_content = Rc::clone(&self.observer);
        let on_cursor = Rc::clone(&self.observer);
        let on_action = Rc::clone(&self.observer);
        ViewCallbacks {
            on_content_change: Rc::new(move || {
                let title = doc.borrow().display_title();
                strip.set_title(id, &title);
                on_content.content_changed(id);
            }),
            on_cursor_change: Rc::new(move |cursor| {
                on_cursor.cursor_moved(cursor.line, cursor.column);
            }),
            on_external_action: Rc::new(move |action| on_action.external_action(action)),
        }
    }

    /// Shows a tab's view, creating it on first activation.
    fn show_view(&mut self, id: TabId) {
        if let Some(view) = self.views.get(&id) {
            view.show();
            return;
        }
        let Some(tab) = self.get_tab(id) else {
            return;
        };
        let view = create_view(&self.ctx, tab, self.callbacks_for(tab));
        view.show();
        self.views.insert(id, view);
    }

    fn drop_view(&mut self, id: TabId) {
        if let Some(view) = self.views.remove(&id) {
            view.destroy();
        }
        self.ctx.registry.borrow_mut().unregister_view(id);
    }

    /// Makes a tab the visible one.
    ///
    /// The previous view is hidden, not destroyed. Unknown ids are ignored
    /// and leave the current state untouched.
    pub fn set_active_tab(&mut self, id: TabId) -> Option<&Tab> {
        if self.position(id).is_none() {
            tracing::debug!(tab_id = %id, "Ignoring activation of unknown tab");
            return None;
        }

        if let Some(previous) = self.active_tab_id.filter(|previous| *previous != id) {
            self.strip.set_active(previous, false);
            if let Some(view) = self.views.get(&previous) {
                view.hide();
            }
        }
        for tab in &mut self.tabs {
            tab.is_active = tab.id() == id;
        }
        self.active_tab_id = Some(id);
        self.strip.set_active(id, true);

        self.show_view(id);
        if let Some(tab) = self.get_tab(id) {
            self.strip.set_title(id, &tab.display_title());
        }
        self.observer.tab_activated(id);
        self.get_tab(id)
    }

    /// Closes a tab, destroying its view and any backend session it owns.
    ///
    /// A modified tab with savable content is closed only if `confirm`
    /// returns true. When the active tab closes, the tab now at the same
    /// index (clamped) becomes active; closing the last tab opens a fresh
    /// scratch tab.
    pub fn close_tab(&mut self, id: TabId, confirm: impl FnOnce(&Tab) -> bool) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let tab = &self.tabs[index];
        if tab.is_modified() && tab.kind().is_savable() && !confirm(tab) {
            tracing::debug!(tab_id = %id, "Close cancelled, unsaved changes kept");
            return false;
        }

        let _span = tracing::info_span!(span_names::TAB_CLOSE, tab_id = %id).entered();
        self.tabs.remove(index);
        self.strip.remove_header(id);
        self.drop_view(id);
        self.observer.tabs_changed();

        if self.active_tab_id == Some(id) {
            self.active_tab_id = None;
            if self.tabs.is_empty() {
                self.create_tab(NewTab::scratch());
            } else {
                let next = self.tabs[index.min(self.tabs.len() - 1)].id();
                self.set_active_tab(next);
            }
        }
        tracing::debug!(count = self.tabs.len(), "Tab closed");
        true
    }

    /// Closes a tab without asking for confirmation.
    pub fn force_close_tab(&mut self, id: TabId) -> bool {
        self.close_tab(id, |_| true)
    }

    /// Merges fields onto a tab.
    ///
    /// A kind change within the same adapter family is handled in place
    /// by the view; any other kind change replaces the view. Replacing
    /// content rebuilds the view from the new text.
    pub fn update_tab(&mut self, id: TabId, update: TabUpdate) -> bool {
        let Some(tab) = self.get_tab(id) else {
            return false;
        };
        let _span = tracing::debug_span!(span_names::TAB_UPDATE, tab_id = %id).entered();
        let content_changed = update.content.is_some();
        let doc = tab.shared_document();
        let previous_kind = update.apply(&mut doc.borrow_mut());
        let kind = doc.borrow().kind;
        let is_active = tab.is_active();
        self.strip.set_title(id, &doc.borrow().display_title());

        match previous_kind {
            Some(previous) if !previous.same_adapter(kind) => {
                tracing::debug!(tab_id = %id, from = %previous, to = %kind, "Replacing view");
                self.drop_view(id);
                if is_active {
                    self.show_view(id);
                }
            }
            Some(_) => {
                if let Some(view) = self.views.get(&id) {
                    view.change_kind();
                }
            }
            None if content_changed => {
                if let Some(view) = self.views.get(&id) {
                    view.change_kind();
                }
            }
            None => {}
        }

        self.observer.tabs_changed();
        self.observer.content_changed(id);
        true
    }

    /// Records a successful save of a tab.
    pub fn mark_saved(&mut self, id: TabId, path: impl Into<PathBuf>, title: &str) -> bool {
        self.update_tab(id, TabUpdate::saved(path, title))
    }

    /// Returns the active tab.
    #[must_use]
    pub fn get_active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.and_then(|id| self.get_tab(id))
    }

    /// Returns the active tab id.
    #[must_use]
    pub const fn active_tab_id(&self) -> Option<TabId> {
        self.active_tab_id
    }

    /// Looks up a tab.
    #[must_use]
    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    /// All tabs in visual order.
    #[must_use]
    pub fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Number of open tabs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tabs.len()
    }

    /// Returns the view of a tab, if it has been created.
    #[must_use]
    pub fn view(&self, id: TabId) -> Option<TabView> {
        self.views.get(&id).cloned()
    }

    /// Returns the active tab's view.
    #[must_use]
    pub fn active_view(&self) -> Option<TabView> {
        self.active_tab_id.and_then(|id| self.view(id))
    }

    /// Scrolls the active tab to a 1-based line.
    pub fn scroll_to_line(&self, line: usize) -> bool {
        self.active_view()
            .is_some_and(|view| view.scroll_to_line(line))
    }

    /// Activates the tab to the right of the active one, wrapping around.
    pub fn activate_next(&mut self) -> Option<TabId> {
        self.activate_relative(1)
    }

    /// Activates the tab to the left of the active one, wrapping around.
    pub fn activate_previous(&mut self) -> Option<TabId> {
        self.activate_relative(self.tabs.len().saturating_sub(1))
    }

    fn activate_relative(&mut self, step: usize) -> Option<TabId> {
        let current = self.active_tab_id.and_then(|id| self.position(id))?;
        let next = self.tabs[(current + step) % self.tabs.len()].id();
        self.set_active_tab(next);
        Some(next)
    }

    /// Destroys every view, releasing all backend sessions. Tab records
    /// are kept.
    pub fn shutdown(&mut self) {
        let ids: Vec<TabId> = self.views.keys().copied().collect();
        for id in ids {
            self.drop_view(id);
        }
        tracing::info!("All views destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentKind, Language};
    use crate::testing::FakeHost;

    fn manager(host: &FakeHost) -> TabManager {
        TabManager::new(
            host.context(),
            host.strip.clone(),
            host.observer.clone(),
            &AppSettings::default(),
        )
    }

    // ===== Creation =====

    #[test]
    fn starts_with_one_active_scratch_tab() {
        let host = FakeHost::new();
        let manager = manager(&host);
        assert_eq!(manager.count(), 1);
        let tab = manager.get_active_tab().unwrap();
        assert_eq!(tab.title(), "Untitled.txt");
        assert_eq!(tab.content(), "// New file\n// Start coding here...");
        assert!(!tab.is_modified());
    }

    #[test]
    fn empty_title_gets_numbered_fallback() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let first = manager.create_tab(NewTab::scratch().with_title("")).unwrap();
        let second = manager.create_tab(NewTab::scratch().with_title("")).unwrap();
        assert_eq!(manager.get_tab(first).unwrap().title(), "Untitled-1");
        assert_eq!(manager.get_tab(second).unwrap().title(), "Untitled-2");
    }

    #[test]
    fn explicit_empty_content_is_kept() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager
            .create_tab(NewTab::of_kind("notes.md", ContentKind::Code(Language::Markdown)))
            .unwrap();
        assert_eq!(manager.get_tab(id).unwrap().content(), "");
    }

    #[test]
    fn tab_limit_returns_none() {
        let host = FakeHost::new();
        let mut settings = AppSettings::default();
        settings.tabs.max_tabs = 2;
        let mut manager = TabManager::new(
            host.context(),
            host.strip.clone(),
            host.observer.clone(),
            &settings,
        );
        assert!(manager.create_tab(NewTab::scratch()).is_some());
        let active = manager.active_tab_id();
        assert_eq!(manager.create_tab(NewTab::scratch()), None);
        assert_eq!(manager.count(), 2);
        assert_eq!(manager.active_tab_id(), active);
    }

    // ===== Activation =====

    #[test]
    fn activation_hides_previous_view_without_destroying_it() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let first = manager.active_tab_id().unwrap();
        let second = manager.create_tab(NewTab::scratch()).unwrap();

        let first_view = manager.view(first).unwrap();
        assert!(!first_view.is_destroyed());
        assert!(manager.get_tab(second).unwrap().is_active());
        assert!(!manager.get_tab(first).unwrap().is_active());

        manager.set_active_tab(first);
        assert!(manager.view(second).is_some());
        assert_eq!(host.widgets.created(), 2);
    }

    #[test]
    fn unknown_id_activation_is_noop() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let active = manager.active_tab_id();
        let activations = host.observer.activations().len();
        assert!(manager.set_active_tab(TabId::new()).is_none());
        assert_eq!(manager.active_tab_id(), active);
        assert_eq!(host.observer.activations().len(), activations);
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let first = manager.active_tab_id().unwrap();
        let second = manager.create_tab(NewTab::scratch()).unwrap();
        assert_eq!(manager.activate_next(), Some(first));
        assert_eq!(manager.activate_previous(), Some(second));
    }

    // ===== Closing =====

    #[test]
    fn closing_active_tab_activates_same_index() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let a = manager.active_tab_id().unwrap();
        let b = manager.create_tab(NewTab::scratch()).unwrap();
        let c = manager.create_tab(NewTab::scratch()).unwrap();
        manager.set_active_tab(b);

        assert!(manager.force_close_tab(b));
        assert_eq!(manager.active_tab_id(), Some(c));

        assert!(manager.force_close_tab(c));
        assert_eq!(manager.active_tab_id(), Some(a));
    }

    #[test]
    fn closing_last_tab_creates_scratch() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let only = manager.active_tab_id().unwrap();
        assert!(manager.force_close_tab(only));
        assert_eq!(manager.count(), 1);
        let fresh = manager.active_tab_id().unwrap();
        assert_ne!(fresh, only);
    }

    #[test]
    fn modified_tab_requires_confirmation() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager.active_tab_id().unwrap();
        manager.update_tab(id, TabUpdate::new().modified(true));

        assert!(!manager.close_tab(id, |_| false));
        assert_eq!(manager.count(), 1);
        assert!(manager.close_tab(id, |tab| tab.title() == "Untitled.txt"));
        assert!(manager.get_tab(id).is_none());
    }

    #[test]
    fn modified_terminal_closes_without_confirmation() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager
            .create_tab(NewTab::of_kind("Terminal", ContentKind::Terminal))
            .unwrap();
        manager.update_tab(id, TabUpdate::new().modified(true));
        assert!(manager.close_tab(id, |_| panic!("terminal tabs never ask")));
    }

    #[test]
    fn close_destroys_view_and_unregisters_it() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager.active_tab_id().unwrap();
        let view = manager.view(id).unwrap();
        manager.force_close_tab(id);
        assert!(view.is_destroyed());
        assert_eq!(manager.registry().borrow().view_kind(id), None);
        assert_eq!(host.listeners.active_count(), 2);
    }

    // ===== Updates =====

    #[test]
    fn language_change_rebuilds_editor_keeping_content() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager.active_tab_id().unwrap();
        let before = manager.view(id).unwrap();

        manager.update_tab(id, TabUpdate::new().kind(ContentKind::Code(Language::Json)));

        let after = manager.view(id).unwrap();
        assert!(!after.is_destroyed());
        assert!(!before.is_destroyed());
        assert_eq!(host.widgets.created(), 2);
        assert_eq!(host.widgets.last().unwrap().language(), Language::Json);
        assert_eq!(
            host.widgets.last().unwrap().text(),
            "// New file\n// Start coding here..."
        );
    }

    #[test]
    fn kind_change_across_adapters_replaces_view() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager.active_tab_id().unwrap();
        let editor = manager.view(id).unwrap();
        manager.update_tab(id, TabUpdate::new().kind(ContentKind::Split));
        assert!(editor.is_destroyed());
        assert!(manager.view(id).unwrap().as_split().is_some());
    }

    #[test]
    fn update_unknown_tab_fails() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        assert!(!manager.update_tab(TabId::new(), TabUpdate::new().title("x")));
    }

    #[test]
    fn saved_update_refreshes_header_title() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        let id = manager.active_tab_id().unwrap();
        manager.update_tab(id, TabUpdate::new().modified(true));
        assert_eq!(host.strip.title(id).as_deref(), Some("Untitled.txt *"));
        manager.mark_saved(id, "/tmp/a.txt", "a.txt");
        assert_eq!(host.strip.title(id).as_deref(), Some("a.txt"));
    }

    #[test]
    fn shutdown_releases_terminal_sessions() {
        let host = FakeHost::new();
        let mut manager = manager(&host);
        manager.create_tab(NewTab::of_kind("Terminal", ContentKind::Terminal));
        assert_eq!(manager.registry().borrow().open_session_count(), 1);
        manager.shutdown();
        assert_eq!(manager.registry().borrow().open_session_count(), 0);
        assert_eq!(host.terminal_backend.stop_count(), 1);
    }
}
