//! Outline panel state bound to the focused editor
//!
//! Clicking a row scrolls the editor and highlights the line for a short
//! while. Edits re-index the document after a debounce.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::OutlineSettings;
use crate::host::Scheduler;
use crate::model::TimerId;
use crate::view::{EditorView, ViewAdapter};

use super::parser::parse_symbols;
use super::tree::{
    OutlineNode, OutlineRow, build_tree, first_parent, for_each_parent_mut, node_at, node_at_mut,
    visible_rows,
};

/// What the panel currently displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineStatus {
    /// No editor is bound or its document is blank
    NoContent,
    /// The document has text but no recognizable symbols
    NoSymbols,
    /// The tree has at least one node
    Ready,
}

struct PanelInner {
    scheduler: Rc<dyn Scheduler>,
    settings: OutlineSettings,
    editor: RefCell<Option<EditorView>>,
    tree: RefCell<Vec<OutlineNode>>,
    status: Cell<OutlineStatus>,
    highlight_timer: Cell<Option<TimerId>>,
    refresh_timer: Cell<Option<TimerId>>,
}

impl PanelInner {
    fn refresh(&self) -> usize {
        self.refresh_timer.set(None);
        let text = self
            .editor
            .borrow()
            .as_ref()
            .filter(|editor| !editor.is_destroyed())
            .map(EditorView::text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            self.tree.borrow_mut().clear();
            self.status.set(OutlineStatus::NoContent);
            return 0;
        }

        let symbols = parse_symbols(&text);
        let count = symbols.len();
        let tree = build_tree(symbols);
        self.status.set(if tree.is_empty() {
            OutlineStatus::NoSymbols
        } else {
            OutlineStatus::Ready
        });
        *self.tree.borrow_mut() = tree;
        tracing::debug!(symbols = count, "Outline refreshed");
        count
    }

    fn cancel_highlight(&self) {
        if let Some(id) = self.highlight_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn cancel_refresh(&self) {
        if let Some(id) = self.refresh_timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

/// Outline of the focused editor's document.
#[derive(Clone)]
pub struct OutlinePanel {
    inner: Rc<PanelInner>,
}

impl OutlinePanel {
    /// Creates an unbound panel.
    #[must_use]
    pub fn new(scheduler: Rc<dyn Scheduler>, settings: OutlineSettings) -> Self {
        Self {
            inner: Rc::new(PanelInner {
                scheduler,
                settings,
                editor: RefCell::new(None),
                tree: RefCell::new(Vec::new()),
                status: Cell::new(OutlineStatus::NoContent),
                highlight_timer: Cell::new(None),
                refresh_timer: Cell::new(None),
            }),
        }
    }

    fn weak(&self) -> Weak<PanelInner> {
        Rc::downgrade(&self.inner)
    }

    /// Binds the panel to an editor, or unbinds it, and re-indexes at once.
    pub fn set_editor(&self, editor: Option<EditorView>) {
        self.inner.cancel_highlight();
        self.inner.cancel_refresh();
        *self.inner.editor.borrow_mut() = editor;
        self.inner.refresh();
    }

    /// Editor the panel is bound to.
    #[must_use]
    pub fn editor(&self) -> Option<EditorView> {
        self.inner.editor.borrow().clone()
    }

    /// Re-indexes the bound document. Returns the number of symbols found.
    pub fn refresh(&self) -> usize {
        self.inner.cancel_refresh();
        self.inner.refresh()
    }

    /// Re-indexes after the debounce delay. A later call restarts the delay.
    pub fn schedule_refresh(&self) {
        self.inner.cancel_refresh();
        let weak = self.weak();
        let delay = Duration::from_millis(self.inner.settings.refresh_debounce_ms);
        let id = self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            }),
        );
        self.inner.refresh_timer.set(Some(id));
    }

    /// Returns true while a debounced refresh is pending.
    #[must_use]
    pub fn is_refresh_pending(&self) -> bool {
        self.inner.refresh_timer.get().is_some()
    }

    /// Current display status.
    #[must_use]
    pub fn status(&self) -> OutlineStatus {
        self.inner.status.get()
    }

    /// Snapshot of the tree.
    #[must_use]
    pub fn tree(&self) -> Vec<OutlineNode> {
        self.inner.tree.borrow().clone()
    }

    /// Rows currently visible, with labels truncated.
    #[must_use]
    pub fn rows(&self) -> Vec<OutlineRow> {
        visible_rows(&self.inner.tree.borrow(), self.inner.settings.max_label_len)
    }

    /// Path of the first visible row declared on a 0-based line.
    #[must_use]
    pub fn row_at_line(&self, line: usize) -> Option<Vec<usize>> {
        self.rows()
            .into_iter()
            .find(|row| row.line == line)
            .map(|row| row.path)
    }

    /// Scrolls the editor to a 0-based line and highlights it temporarily.
    ///
    /// Returns false if no editor is bound or the line is out of range.
    pub fn navigate_to_line(&self, line: usize) -> bool {
        let Some(editor) = self.editor() else {
            return false;
        };
        if editor.is_destroyed() {
            return false;
        }
        if line >= editor.line_count() {
            tracing::warn!(line, lines = editor.line_count(), "Line out of range");
            return false;
        }

        self.inner.cancel_highlight();
        let target = line + 1;
        editor.scroll_to_line(target);
        editor.highlight_line(Some(target));

        let weak = self.weak();
        let delay = Duration::from_millis(self.inner.settings.highlight_duration_ms);
        let id = self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                editor.highlight_line(None);
                if let Some(inner) = weak.upgrade() {
                    inner.highlight_timer.set(None);
                }
            }),
        );
        self.inner.highlight_timer.set(Some(id));
        true
    }

    /// Returns true while a line highlight is waiting to be cleared.
    #[must_use]
    pub fn is_highlight_pending(&self) -> bool {
        self.inner.highlight_timer.get().is_some()
    }

    /// Handles a click on a row: navigates to its line, and toggles the
    /// node if it has children.
    pub fn click(&self, path: &[usize]) -> bool {
        let Some((line, has_children)) = node_at(&self.inner.tree.borrow(), path)
            .map(|node| (node.symbol.line, node.has_children()))
        else {
            return false;
        };
        let navigated = self.navigate_to_line(line);
        if has_children {
            self.toggle_node(path);
        }
        navigated
    }

    /// Flips the collapsed state of a node with children.
    ///
    /// Returns the new state, or `None` for a leaf or an unknown path.
    pub fn toggle_node(&self, path: &[usize]) -> Option<bool> {
        let mut tree = self.inner.tree.borrow_mut();
        let node = node_at_mut(&mut tree, path).filter(|node| node.has_children())?;
        node.collapsed = !node.collapsed;
        Some(node.collapsed)
    }

    /// Collapses every parent node if the first one is expanded, otherwise
    /// expands them all. Returns the state applied.
    pub fn toggle_all(&self) -> bool {
        let mut tree = self.inner.tree.borrow_mut();
        let collapse = first_parent(&tree).is_some_and(|node| !node.collapsed);
        for_each_parent_mut(&mut tree, &mut |node| node.collapsed = collapse);
        collapse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TextWidget;
    use crate::testing::FakeHost;

    fn panel_with(host: &FakeHost, text: &str) -> (OutlinePanel, EditorView) {
        let editor = host.editor("a.js", text);
        let panel = OutlinePanel::new(host.scheduler.clone(), OutlineSettings::default());
        panel.set_editor(Some(editor.clone()));
        (panel, editor)
    }

    // ========== Refresh ==========

    #[test]
    fn blank_document_shows_empty_state() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "  \n ");
        assert_eq!(panel.status(), OutlineStatus::NoContent);
        assert!(panel.rows().is_empty());
    }

    #[test]
    fn text_without_symbols_reports_no_symbols() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "just prose here");
        assert_eq!(panel.status(), OutlineStatus::NoSymbols);
    }

    #[test]
    fn unbound_panel_has_no_content() {
        let host = FakeHost::new();
        let panel = OutlinePanel::new(host.scheduler.clone(), OutlineSettings::default());
        assert_eq!(panel.refresh(), 0);
        assert_eq!(panel.status(), OutlineStatus::NoContent);
        assert!(!panel.navigate_to_line(0));
    }

    #[test]
    fn debounced_refresh_runs_once_after_delay() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "function foo(){}");
        let widget = host.widgets.last().expect("widget created");
        widget.replace_range(16, 16, "\nfunction bar(){}");

        panel.schedule_refresh();
        host.scheduler.advance(Duration::from_millis(300));
        panel.schedule_refresh();
        host.scheduler.advance(Duration::from_millis(300));
        assert_eq!(panel.rows().len(), 1);
        assert!(panel.is_refresh_pending());

        host.scheduler.advance(Duration::from_millis(200));
        assert_eq!(panel.rows().len(), 2);
        assert!(!panel.is_refresh_pending());
    }

    // ========== Navigation ==========

    #[test]
    fn navigation_highlights_then_clears() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "let a = 1;\nfunction foo() {\n}");
        assert!(panel.navigate_to_line(1));

        let widget = host.widgets.last().expect("widget created");
        assert_eq!(widget.highlight(), Some(2));
        assert_eq!(widget.selection().head, 11);

        host.scheduler.advance(Duration::from_millis(2999));
        assert_eq!(widget.highlight(), Some(2));
        host.scheduler.advance(Duration::from_millis(1));
        assert_eq!(widget.highlight(), None);
        assert!(!panel.is_highlight_pending());
    }

    #[test]
    fn second_navigation_restarts_highlight_timer() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "a\nb\nc");
        panel.navigate_to_line(0);
        host.scheduler.advance(Duration::from_millis(2000));
        panel.navigate_to_line(2);
        host.scheduler.advance(Duration::from_millis(2000));

        let widget = host.widgets.last().expect("widget created");
        assert_eq!(widget.highlight(), Some(3));
        host.scheduler.advance(Duration::from_millis(1000));
        assert_eq!(widget.highlight(), None);
    }

    #[test]
    fn out_of_range_line_is_ignored() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "one line");
        assert!(!panel.navigate_to_line(5));
        assert!(!panel.is_highlight_pending());
    }

    // ========== Collapse ==========

    #[test]
    fn clicking_parent_navigates_and_toggles() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "class Animal {\n  speak() {\n  }\n}");
        assert_eq!(panel.rows().len(), 2);

        assert!(panel.click(&[0]));
        assert_eq!(panel.rows().len(), 1);
        assert!(panel.click(&[0]));
        assert_eq!(panel.rows().len(), 2);
    }

    #[test]
    fn toggle_leaf_is_none() {
        let host = FakeHost::new();
        let (panel, _editor) = panel_with(&host, "function foo(){}");
        assert_eq!(panel.toggle_node(&[0]), None);
        assert_eq!(panel.toggle_node(&[9]), None);
    }

    #[test]
    fn toggle_all_follows_first_parent() {
        let host = FakeHost::new();
        let text = "class Alpha {\n  alphaRun() {\n}\nclass Beta {\n  betaRun() {\n}";
        let (panel, _editor) = panel_with(&host, text);
        assert_eq!(panel.rows().len(), 4);

        assert!(panel.toggle_all());
        assert_eq!(panel.rows().len(), 2);

        panel.toggle_node(&[1]);
        assert!(!panel.toggle_all());
        assert_eq!(panel.rows().len(), 4);
    }
}
