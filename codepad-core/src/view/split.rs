//! Split view adapter
//!
//! Composes two independent editors, each bound to its own pane document,
//! with a draggable divider between them. Only the focused pane reports
//! cursor movement; the tab counts as modified while either pane is.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use crate::error::{ValidationError, ViewError, ViewResult};
use crate::host::{
    DocumentEvent, ExternalAction, ListenerKind, ListenerSet, Markup, Point, Sizing, Surface,
    SurfaceRole,
};
use crate::model::{ContentKind, Document, Orientation, Pane, TabId};

use super::editor::{EditorCallbacks, EditorView};
use super::split_layout::{PANE_COUNT, SplitLayout};
use super::text::Cursor;
use super::{ViewAdapter, ViewContext};

/// Callbacks supplied by the owner of a split view.
#[derive(Clone)]
pub struct SplitCallbacks {
    /// Called with the aggregate dirty flag after a pane's content changed
    pub on_content_change: Rc<dyn Fn(bool)>,
    /// Called with the focused pane's cursor
    pub on_cursor_change: Rc<dyn Fn(Cursor)>,
    /// Called for actions handled outside the view
    pub on_external_action: Rc<dyn Fn(ExternalAction)>,
}

impl SplitCallbacks {
    /// Callbacks that ignore every notification.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            on_content_change: Rc::new(|_| {}),
            on_cursor_change: Rc::new(|_| {}),
            on_external_action: Rc::new(|_| {}),
        }
    }
}

struct PaneSlot {
    pane: Pane,
    surface: Box<dyn Surface>,
    label: Box<dyn Surface>,
    editor: RefCell<Option<EditorView>>,
}

impl PaneSlot {
    fn refresh_label(&self) {
        self.label.render(Markup::Label(self.pane.label()));
    }

    fn editor(&self) -> Option<EditorView> {
        self.editor.borrow().clone()
    }
}

struct SplitInner {
    tab_id: TabId,
    surface: Box<dyn Surface>,
    divider: Box<dyn Surface>,
    panes: [PaneSlot; PANE_COUNT],
    ctx: ViewContext,
    callbacks: SplitCallbacks,
    layout: RefCell<SplitLayout>,
    drag: RefCell<ListenerSet>,
    destroyed: Cell<bool>,
}

impl SplitInner {
    fn is_modified(&self) -> bool {
        self.panes.iter().any(|slot| slot.pane.document().is_modified)
    }

    fn editors(&self) -> impl Iterator<Item = EditorView> + '_ {
        self.panes.iter().filter_map(PaneSlot::editor)
    }

    fn request_measure(&self) {
        for editor in self.editors() {
            editor.request_measure();
        }
    }

    fn apply_sizing(&self) {
        let sizing = self.layout.borrow().pane_sizing();
        for (slot, sizing) in self.panes.iter().zip(sizing) {
            slot.surface.set_sizing(sizing);
        }
    }

    fn drag_to(&self, pointer: Point) -> f64 {
        let bounds = self.surface.bounds();
        let applied = {
            let mut layout = self.layout.borrow_mut();
            let raw = layout.ratio_at(pointer, bounds);
            layout.set_ratio(raw)
        };
        self.apply_sizing();
        self.request_measure();
        applied
    }

    fn end_drag(&self) -> bool {
        let removed = self.drag.borrow_mut().remove_all();
        removed > 0
    }
}

/// Adapter composing two editors side by side or stacked.
#[derive(Clone)]
pub struct SplitView {
    inner: Rc<SplitInner>,
}

impl SplitView {
    /// Builds both panes, the divider and an editor per pane.
    #[must_use]
    pub fn new(
        tab_id: TabId,
        surface: Box<dyn Surface>,
        orientation: Orientation,
        ctx: ViewContext,
        callbacks: SplitCallbacks,
    ) -> Self {
        surface.set_orientation(orientation);
        let first = Self::build_slot(&ctx, surface.as_ref(), 0);
        let divider = surface.create_child(SurfaceRole::SplitDivider);
        let second = Self::build_slot(&ctx, surface.as_ref(), 1);
        let drag = ListenerSet::new(Rc::clone(&ctx.host.listeners));

        let view = Self {
            inner: Rc::new(SplitInner {
                tab_id,
                surface,
                divider,
                panes: [first, second],
                ctx,
                callbacks,
                layout: RefCell::new(SplitLayout::new(orientation)),
                drag: RefCell::new(drag),
                destroyed: Cell::new(false),
            }),
        };
        for index in 0..PANE_COUNT {
            view.create_editor(index);
        }
        view
    }

    fn build_slot(ctx: &ViewContext, container: &dyn Surface, index: usize) -> PaneSlot {
        let id = ctx.registry.borrow_mut().next_pane_id();
        let surface = container.create_child(SurfaceRole::SplitPane(index));
        let label = surface.create_child(SurfaceRole::PaneLabel(index));
        let slot = PaneSlot {
            pane: Pane::new(id, Document::default()),
            surface,
            label,
            editor: RefCell::new(None),
        };
        slot.refresh_label();
        slot
    }

    fn weak(&self) -> Weak<SplitInner> {
        Rc::downgrade(&self.inner)
    }

    fn editor_callbacks(&self, index: usize) -> EditorCallbacks {
        let on_content = self.weak();
        let on_cursor = self.weak();
        let on_action = Rc::clone(&self.inner.callbacks.on_external_action);
        EditorCallbacks {
            on_content_change: Rc::new(move |_text| {
                if let Some(inner) = on_content.upgrade() {
                    inner.panes[index].refresh_label();
                    (inner.callbacks.on_content_change)(inner.is_modified());
                }
            }),
            on_cursor_change: Rc::new(move |cursor| {
                if let Some(inner) = on_cursor.upgrade() {
                    if inner.layout.borrow().focused() == index {
                        (inner.callbacks.on_cursor_change)(cursor);
                    }
                }
            }),
            on_external_action: on_action,
        }
    }

    /// Replaces the editor of one pane with a fresh one bound to the pane
    /// document.
    fn create_editor(&self, index: usize) {
        let slot = &self.inner.panes[index];
        let previous = slot.editor.borrow_mut().take();
        if let Some(previous) = previous {
            previous.destroy();
        }
        let editor = EditorView::new(
            slot.surface.create_child(SurfaceRole::Editor),
            slot.pane.shared_document(),
            self.inner.ctx.host.clone(),
            self.inner.ctx.editor.clone(),
            self.editor_callbacks(index),
        );
        *slot.editor.borrow_mut() = Some(editor);
        slot.refresh_label();
    }

    /// Tab this view belongs to.
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Current orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.inner.layout.borrow().orientation()
    }

    /// Index of the focused pane.
    #[must_use]
    pub fn focused_index(&self) -> usize {
        self.inner.layout.borrow().focused()
    }

    /// Explicit divider ratio, `None` while both panes are flexible.
    #[must_use]
    pub fn split_ratio(&self) -> Option<f64> {
        self.inner.layout.borrow().ratio()
    }

    /// Returns a pane record.
    #[must_use]
    pub fn pane(&self, index: usize) -> Option<Pane> {
        self.inner.panes.get(index).map(|slot| slot.pane.clone())
    }

    /// Returns the editor of a pane.
    #[must_use]
    pub fn pane_editor(&self, index: usize) -> Option<EditorView> {
        self.inner.panes.get(index).and_then(PaneSlot::editor)
    }

    /// Returns the focused pane's editor.
    #[must_use]
    pub fn focused_editor(&self) -> Option<EditorView> {
        self.pane_editor(self.focused_index())
    }

    /// Snapshot of the focused pane's document.
    #[must_use]
    pub fn focused_pane_data(&self) -> Document {
        self.inner.panes[self.focused_index()].pane.document().clone()
    }

    /// Focuses a pane and reports its cursor.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PaneIndexOutOfRange` for an unknown pane.
    pub fn focus_pane(&self, index: usize) -> Result<(), ValidationError> {
        self.inner.layout.borrow_mut().set_focus(index)?;
        if let Some(cursor) = self.pane_editor(index).and_then(|editor| editor.cursor()) {
            (self.inner.callbacks.on_cursor_change)(cursor);
        }
        Ok(())
    }

    /// Loads a file into a pane, replacing its editor.
    ///
    /// The pane starts clean. Only code documents can be shown in a pane.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is destroyed, the index is not a pane,
    /// or the content is not editable text.
    pub fn load_file_in_pane(
        &self,
        index: usize,
        title: &str,
        content: &str,
        kind: ContentKind,
        path: Option<PathBuf>,
    ) -> ViewResult<()> {
        if self.is_destroyed() {
            return Err(ViewError::Destroyed(self.inner.tab_id));
        }
        let slot = self
            .inner
            .panes
            .get(index)
            .ok_or(ValidationError::PaneIndexOutOfRange(index))?;
        if kind.language().is_none() {
            return Err(ValidationError::UnsupportedPaneContent(kind.to_string()).into());
        }
        {
            let shared = slot.pane.shared_document();
            let mut doc = shared.borrow_mut();
            doc.title = title.to_string();
            doc.content = content.to_string();
            doc.kind = kind;
            doc.path = path;
            doc.is_modified = false;
        }
        self.create_editor(index);
        tracing::debug!(tab_id = %self.inner.tab_id, pane = index, %kind, "File loaded into pane");
        Ok(())
    }

    /// Clears the focused pane's dirty flag after it was saved and reports
    /// the split's remaining dirty state to the owner.
    pub fn mark_focused_pane_saved(&self, path: impl Into<PathBuf>, title: impl Into<String>) {
        let inner = &self.inner;
        let slot = &inner.panes[self.focused_index()];
        slot.pane.shared_document().borrow_mut().mark_saved(path, title);
        slot.refresh_label();
        (inner.callbacks.on_content_change)(inner.is_modified());
    }

    /// Asks the owner to pick a file for a pane.
    pub fn request_open(&self, index: usize) {
        if index < PANE_COUNT {
            (self.inner.callbacks.on_external_action)(ExternalAction::OpenFileInPane { pane: index });
        }
    }

    /// Flips the orientation, resets both panes to flexible sizing and
    /// re-measures both editors.
    pub fn toggle_orientation(&self) -> Orientation {
        let orientation = self.inner.layout.borrow_mut().toggle_orientation();
        self.inner.surface.set_orientation(orientation);
        for slot in &self.inner.panes {
            slot.surface.set_sizing(Sizing::Flexible);
        }
        self.inner.request_measure();
        orientation
    }

    /// Starts a divider drag; pointer movement resizes the panes until the
    /// pointer is released.
    pub fn begin_drag(&self) {
        if self.is_destroyed() || !self.inner.drag.borrow().is_empty() {
            return;
        }
        let on_move = self.weak();
        let on_up = self.weak();
        let mut drag = self.inner.drag.borrow_mut();
        drag.add(
            ListenerKind::PointerMove,
            Rc::new(move |event| {
                if let (Some(inner), DocumentEvent::PointerMove(point)) =
                    (on_move.upgrade(), event)
                {
                    inner.drag_to(*point);
                }
            }),
        );
        drag.add(
            ListenerKind::PointerUp,
            Rc::new(move |_| {
                if let Some(inner) = on_up.upgrade() {
                    inner.end_drag();
                }
            }),
        );
    }

    /// Applies one drag frame and returns the clamped ratio.
    pub fn drag_to(&self, pointer: Point) -> f64 {
        self.inner.drag_to(pointer)
    }

    /// Ends a divider drag. Returns false if no drag was active.
    pub fn end_drag(&self) -> bool {
        self.inner.end_drag()
    }

    /// Returns true while a divider drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        !self.inner.drag.borrow().is_empty()
    }
}

impl ViewAdapter for SplitView {
    fn show(&self) {
        self.inner.surface.show();
        self.inner.request_measure();
    }

    fn hide(&self) {
        self.inner.end_drag();
        self.inner.surface.hide();
    }

    fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        self.inner.end_drag();
        for slot in &self.inner.panes {
            let editor = slot.editor.borrow_mut().take();
            if let Some(editor) = editor {
                editor.destroy();
            }
        }
        self.inner.divider.remove();
        self.inner.surface.remove();
        tracing::debug!(tab_id = %self.inner.tab_id, "Split view destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    fn is_modified(&self) -> bool {
        self.inner.is_modified()
    }

    /// Scrolls the focused pane.
    fn scroll_to_line(&self, line: usize) -> bool {
        self.focused_editor()
            .is_some_and(|editor| editor.scroll_to_line(line))
    }

    fn change_kind(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Rect, Selection, SurfaceHost, TextWidget};
    use crate::model::Language;
    use crate::testing::FakeHost;

    struct Recorded {
        modified: Rc<RefCell<Vec<bool>>>,
        cursors: Rc<RefCell<Vec<Cursor>>>,
        actions: Rc<RefCell<Vec<ExternalAction>>>,
    }

    fn split(host: &FakeHost) -> (SplitView, Recorded) {
        let recorded = Recorded {
            modified: Rc::new(RefCell::new(Vec::new())),
            cursors: Rc::new(RefCell::new(Vec::new())),
            actions: Rc::new(RefCell::new(Vec::new())),
        };
        let modified = Rc::clone(&recorded.modified);
        let cursors = Rc::clone(&recorded.cursors);
        let actions = Rc::clone(&recorded.actions);
        let view = SplitView::new(
            TabId::new(),
            host.surfaces.create_surface(SurfaceRole::TabContent),
            Orientation::Vertical,
            host.view_context(),
            SplitCallbacks {
                on_content_change: Rc::new(move |flag| modified.borrow_mut().push(flag)),
                on_cursor_change: Rc::new(move |cursor| cursors.borrow_mut().push(cursor)),
                on_external_action: Rc::new(move |action| actions.borrow_mut().push(action)),
            },
        );
        (view, recorded)
    }

    fn load(view: &SplitView, index: usize, title: &str, content: &str) {
        view.load_file_in_pane(
            index,
            title,
            content,
            ContentKind::Code(Language::JavaScript),
            Some(PathBuf::from(format!("/src/{title}"))),
        )
        .expect("pane accepts code");
    }

    // ===== Construction =====

    #[test]
    fn new_split_has_two_empty_panes() {
        let host = FakeHost::new();
        let (view, _) = split(&host);

        assert_eq!(host.widgets.created(), 2);
        assert_eq!(host.surfaces.with_role(SurfaceRole::SplitDivider).len(), 1);
        let label = host
            .surfaces
            .last(SurfaceRole::PaneLabel(1))
            .expect("label surface");
        assert_eq!(label.markup(), Some(Markup::Label("Empty".into())));
        assert_eq!(view.focused_index(), 0);
        assert_eq!(view.split_ratio(), None);
        assert!(!view.is_modified());
    }

    // ===== Loading =====

    #[test]
    fn load_replaces_pane_editor_with_clean_document() {
        let host = FakeHost::new();
        let (view, _) = split(&host);
        load(&view, 1, "b.js", "let b;");

        assert_eq!(host.widgets.created(), 3);
        assert_eq!(host.widgets.live_count(), 2);
        let pane = view.pane(1).expect("second pane");
        assert_eq!(pane.document().content, "let b;");
        assert!(!pane.document().is_modified);
        assert_eq!(pane.label(), "b.js");
        assert_eq!(
            view.pane_editor(1).expect("pane editor").text(),
            "let b;"
        );
    }

    #[test]
    fn binary_content_is_rejected() {
        let host = FakeHost::new();
        let (view, _) = split(&host);
        let result = view.load_file_in_pane(0, "a.png", "", ContentKind::Image, None);
        assert_eq!(
            result,
            Err(ViewError::Validation(ValidationError::UnsupportedPaneContent(
                "image".into()
            )))
        );
        assert_eq!(host.widgets.created(), 2);
    }

    #[test]
    fn unknown_pane_index_is_rejected() {
        let host = FakeHost::new();
        let (view, _) = split(&host);
        let result = view.load_file_in_pane(2, "a.js", "", ContentKind::default(), None);
        assert_eq!(
            result,
            Err(ViewError::Validation(ValidationError::PaneIndexOutOfRange(2)))
        );
        assert_eq!(view.focus_pane(5), Err(ValidationError::PaneIndexOutOfRange(5)));
    }

    // ===== Editing =====

    #[test]
    fn editing_a_pane_marks_the_split_modified() {
        let host = FakeHost::new();
        let (view, recorded) = split(&host);
        load(&view, 0, "a.js", "x");

        host.widgets.last().expect("pane widget").type_text("y");

        assert!(view.pane(0).expect("first pane").document().is_modified);
        assert!(view.is_modified());
        assert_eq!(*recorded.modified.borrow(), vec![true]);
        assert_eq!(view.pane(0).expect("first pane").label(), "a.js *");
    }

    #[test]
    fn only_focused_pane_reports_cursor() {
        let host = FakeHost::new();
        let (view, recorded) = split(&host);
        let second = host.widgets.last().expect("second widget");

        second.type_text("abc");
        assert!(recorded.cursors.borrow().is_empty());

        view.focus_pane(1).expect("valid pane");
        assert_eq!(*recorded.cursors.borrow(), vec![Cursor::new(1, 4)]);
        second.set_selection(Selection::cursor(1));
        assert_eq!(recorded.cursors.borrow().last(), Some(&Cursor::new(1, 2)));
    }

    #[test]
    fn saving_focused_pane_clears_its_flag() {
        let host = FakeHost::new();
        let (view, recorded) = split(&host);
        load(&view, 0, "a.js", "x");
        host.widgets.last().expect("pane widget").type_text("y");

        view.mark_focused_pane_saved("/src/renamed.js", "renamed.js");

        let pane = view.pane(0).expect("first pane");
        assert!(!pane.document().is_modified);
        assert_eq!(pane.label(), "renamed.js");
        assert!(!view.is_modified());
        assert_eq!(recorded.modified.borrow().last(), Some(&false));
    }

    #[test]
    fn toggle_orientation_keeps_content_and_flags() {
        let host = FakeHost::new();
        let (view, _) = split(&host);
        load(&view, 0, "x.js", "X");
        load(&view, 1, "y.js", "Y");
        host.widgets.last().expect("pane widget").type_text("!");
        view.begin_drag();
        view.drag_to(Point::new(600.0, 0.0));
        view.end_drag();

        assert_eq!(view.toggle_orientation(), Orientation::Horizontal);

        assert_eq!(view.split_ratio(), None);
        assert_eq!(view.pane(0).expect("first pane").document().content, "X");
        assert_eq!(view.pane(1).expect("second pane").document().content, "!Y");
        assert!(!view.pane(0).expect("first pane").document().is_modified);
        assert!(view.pane(1).expect("second pane").document().is_modified);
        let pane = host
            .surfaces
            .last(SurfaceRole::SplitPane(0))
            .expect("pane surface");
        assert_eq!(pane.sizing(), Sizing::Flexible);
        let container = host
            .surfaces
            .last(SurfaceRole::TabContent)
            .expect("container surface");
        assert_eq!(container.orientation(), Some(Orientation::Horizontal));
        assert_eq!(host.widgets.live_count(), 2);
    }

    #[test]
    fn request_open_asks_owner_for_file() {
        let host = FakeHost::new();
        let (view, recorded) = split(&host);
        view.request_open(1);
        view.request_open(7);
        assert_eq!(
            *recorded.actions.borrow(),
            vec![ExternalAction::OpenFileInPane { pane: 1 }]
        );
    }

    // ===== Divider drag =====

    #[test]
    fn drag_is_clamped_and_ends_on_pointer_up() {
        let host = FakeHost::new();
        let (view, _) = split(&host);
        host.surfaces
            .last(SurfaceRole::TabContent)
            .expect("container surface")
            .set_bounds(Rect::new(100.0, 0.0, 1000.0, 500.0));

        view.begin_drag();
        view.begin_drag();
        assert!(view.is_dragging());
        assert_eq!(host.listeners.active_count(), 4 + 2);

        host.listeners
            .dispatch(&DocumentEvent::PointerMove(Point::new(110.0, 50.0)));
        assert_eq!(view.split_ratio(), Some(0.10));
        host.listeners
            .dispatch(&DocumentEvent::PointerMove(Point::new(400.0, 50.0)));
        let ratio = view.split_ratio().expect("explicit ratio");
        assert!((ratio - 0.3).abs() < 1e-9);
        let first = host
            .surfaces
            .last(SurfaceRole::SplitPane(0))
            .expect("pane surface");
        assert!(matches!(first.sizing(), Sizing::Percent(p) if (p - 30.0).abs() < 1e-6));

        host.listeners
            .dispatch(&DocumentEvent::PointerUp(Point::new(400.0, 50.0)));
        assert!(!view.is_dragging());
        assert_eq!(host.listeners.active_count(), 4);
        assert!(!view.end_drag());
    }

    // ===== Lifecycle =====

    #[test]
    fn destroy_releases_both_editors_once() {
        let host = FakeHost::new();
        let (view, _) = split(&host);
        view.begin_drag();

        view.destroy();
        view.destroy();

        assert!(view.is_destroyed());
        assert_eq!(host.widgets.live_count(), 0);
        assert_eq!(host.listeners.active_count(), 0);
        assert!(view.pane_editor(0).is_none());
        assert!(!view.scroll_to_line(1));
        assert_eq!(
            view.load_file_in_pane(0, "a.js", "", ContentKind::default(), None),
            Err(ViewError::Destroyed(view.tab_id()))
        );
        let container = host
            .surfaces
            .last(SurfaceRole::TabContent)
            .expect("container surface");
        assert!(container.is_removed());
    }
}
