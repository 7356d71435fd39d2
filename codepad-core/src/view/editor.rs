//! Plain editor adapter
//!
//! Wraps one embedded text widget bound to a document. The widget's change
//! stream keeps the document's content and dirty flag current, and the
//! adapter owns exactly two document-level listeners that dismiss its
//! context menu.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::config::EditorSettings;
use crate::format::{FormatOutcome, format_code};
use crate::host::{
    ExternalAction, HostContext, ListenerKind, ListenerSet, MenuAction, MenuEntry,
    OverlayHandle, Point, Selection, Surface, TextWidget, WidgetConfig, WidgetEvent,
    WidgetListener, WidgetPanel, open_menu,
};
use crate::model::{Language, SharedDocument};

use super::ViewAdapter;
use super::text::{Cursor, cursor_at, line_count, line_start, slice_chars};

/// Callbacks supplied by the owner of an editor.
#[derive(Clone)]
pub struct EditorCallbacks {
    /// Called with the new text after a real content change
    pub on_content_change: Rc<dyn Fn(&str)>,
    /// Called with the cursor after every selection or text change
    pub on_cursor_change: Rc<dyn Fn(Cursor)>,
    /// Called for actions handled outside the editor
    pub on_external_action: Rc<dyn Fn(ExternalAction)>,
}

impl EditorCallbacks {
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

struct EditorInner {
    doc: SharedDocument,
    surface: Box<dyn Surface>,
    host: HostContext,
    settings: EditorSettings,
    callbacks: EditorCallbacks,
    widget: RefCell<Option<Box<dyn TextWidget>>>,
    listeners: RefCell<ListenerSet>,
    menu: RefCell<Option<Box<dyn OverlayHandle>>>,
    destroyed: Cell<bool>,
}

impl EditorInner {
    fn on_widget_event(&self, event: WidgetEvent) {
        if self.destroyed.get() {
            return;
        }
        match event {
            WidgetEvent::DocChanged { text, head } => {
                let changed = {
                    let mut doc = self.doc.borrow_mut();
                    if doc.content == text {
                        false
                    } else {
                        doc.content.clone_from(&text);
                        doc.is_modified = true;
                        true
                    }
                };
                if changed {
                    (self.callbacks.on_content_change)(&text);
                }
                (self.callbacks.on_cursor_change)(cursor_at(&text, head));
            }
            WidgetEvent::SelectionChanged { head } => {
                let cursor = cursor_at(&self.doc.borrow().content, head);
                (self.callbacks.on_cursor_change)(cursor);
            }
        }
    }

    fn close_menu(&self) {
        let handle = self.menu.borrow_mut().take();
        if let Some(handle) = handle {
            handle.close();
        }
    }
}

/// Adapter owning one text widget.
#[derive(Clone)]
pub struct EditorView {
    inner: Rc<EditorInner>,
}

impl EditorView {
    /// Creates the widget inside `surface` and registers the menu listeners.
    #[must_use]
    pub fn new(
        surface: Box<dyn Surface>,
        doc: SharedDocument,
        host: HostContext,
        settings: EditorSettings,
        callbacks: EditorCallbacks,
    ) -> Self {
        let listeners = ListenerSet::new(Rc::clone(&host.listeners));
        let view = Self {
            inner: Rc::new(EditorInner {
                doc,
                surface,
                host,
                settings,
                callbacks,
                widget: RefCell::new(None),
                listeners: RefCell::new(listeners),
                menu: RefCell::new(None),
                destroyed: Cell::new(false),
            }),
        };
        view.attach();
        view
    }

    fn weak(&self) -> Weak<EditorInner> {
        Rc::downgrade(&self.inner)
    }

    fn attach(&self) {
        let inner = &self.inner;
        let weak = self.weak();
        let listener: WidgetListener = Rc::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_widget_event(event);
            }
        });

        let config = {
            let doc = inner.doc.borrow();
            WidgetConfig {
                text: doc.content.clone(),
                language: doc.kind.language().unwrap_or_default(),
                font_family: inner.settings.font_family.clone(),
                font_size: inner.settings.font_size,
                indent_unit: inner.settings.indent_unit(),
            }
        };
        let widget = inner
            .host
            .text_widgets
            .create(inner.surface.as_ref(), config, listener);
        *inner.widget.borrow_mut() = Some(widget);

        let mut listeners = inner.listeners.borrow_mut();
        let weak = self.weak();
        listeners.add(
            ListenerKind::Click,
            Rc::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.close_menu();
                }
            }),
        );
        let weak = self.weak();
        listeners.add(
            ListenerKind::KeyDown,
            Rc::new(move |event| {
                if event.is_escape() {
                    if let Some(inner) = weak.upgrade() {
                        inner.close_menu();
                    }
                }
            }),
        );
    }

    /// Removes listeners, the context menu and the widget, keeping the surface.
    fn detach(&self) {
        let removed = self.inner.listeners.borrow_mut().remove_all();
        tracing::trace!(removed, "Editor listeners removed");
        self.inner.close_menu();
        let widget = self.inner.widget.borrow_mut().take();
        if let Some(widget) = widget {
            widget.dispose();
        }
    }

    fn with_widget<R>(&self, f: impl FnOnce(&dyn TextWidget) -> R) -> Option<R> {
        let widget = self.inner.widget.borrow();
        widget.as_deref().map(f)
    }

    /// Returns the bound document.
    #[must_use]
    pub fn document(&self) -> SharedDocument {
        Rc::clone(&self.inner.doc)
    }

    /// Language the widget was configured with.
    #[must_use]
    pub fn language(&self) -> Language {
        self.inner.doc.borrow().kind.language().unwrap_or_default()
    }

    /// Current widget text, or the stored content if the widget is gone.
    #[must_use]
    pub fn text(&self) -> String {
        self.with_widget(|w| w.text())
            .unwrap_or_else(|| self.inner.doc.borrow().content.clone())
    }

    /// Number of lines in the document.
    #[must_use]
    pub fn line_count(&self) -> usize {
        line_count(&self.text())
    }

    /// Current 1-based cursor position.
    #[must_use]
    pub fn cursor(&self) -> Option<Cursor> {
        self.with_widget(|w| cursor_at(&w.text(), w.selection().head))
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.with_widget(|w| w.selection())
    }

    /// Selected text, if anything is selected.
    #[must_use]
    pub fn selected_text(&self) -> Option<String> {
        self.with_widget(|w| {
            let selection = w.selection();
            if selection.is_empty() {
                None
            } else {
                Some(slice_chars(&w.text(), selection.from(), selection.to()))
            }
        })
        .flatten()
    }

    fn replace_selection(&self, text: &str) -> bool {
        self.with_widget(|w| {
            let selection = w.selection();
            w.replace_range(selection.from(), selection.to(), text);
        })
        .is_some()
    }

    /// Copies the selection to the host clipboard.
    pub fn copy(&self) -> bool {
        let Some(text) = self.selected_text() else {
            return false;
        };
        match self.inner.host.clipboard.set_text(&text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%e, "Copy to clipboard failed");
                false
            }
        }
    }

    /// Copies the selection and removes it.
    pub fn cut(&self) -> bool {
        self.copy() && self.replace_selection("")
    }

    /// Replaces the selection with the host clipboard text.
    pub fn paste(&self) -> bool {
        match self.inner.host.clipboard.get_text() {
            Ok(text) => self.replace_selection(&text),
            Err(e) => {
                tracing::warn!(%e, "Paste from clipboard failed");
                false
            }
        }
    }

    /// Undoes the last change.
    pub fn undo(&self) -> bool {
        self.with_widget(|w| w.undo()).unwrap_or(false)
    }

    /// Redoes the last undone change.
    pub fn redo(&self) -> bool {
        self.with_widget(|w| w.redo()).unwrap_or(false)
    }

    /// Selects the whole document.
    pub fn select_all(&self) -> bool {
        self.with_widget(|w| {
            let end = w.text().chars().count();
            w.set_selection(Selection { anchor: 0, head: end });
        })
        .is_some()
    }

    /// Opens the search panel.
    pub fn open_search(&self) -> bool {
        self.open_panel(WidgetPanel::Search)
    }

    /// Opens the search and replace panel.
    pub fn open_replace(&self) -> bool {
        self.open_panel(WidgetPanel::Replace)
    }

    /// Opens the go-to-line prompt.
    pub fn open_goto_line(&self) -> bool {
        self.open_panel(WidgetPanel::GotoLine)
    }

    fn open_panel(&self, panel: WidgetPanel) -> bool {
        self.with_widget(|w| w.open_panel(panel)).is_some()
    }

    /// Highlights a 1-based line, or clears the highlight.
    pub fn highlight_line(&self, line: Option<usize>) {
        self.with_widget(|w| w.set_line_highlight(line));
    }

    /// Re-measures widget layout.
    pub fn request_measure(&self) {
        self.with_widget(|w| w.request_measure());
    }

    /// Gives keyboard focus to the widget.
    pub fn focus(&self) {
        self.with_widget(|w| w.focus());
    }

    /// Formats the whole document.
    pub fn format_document(&self) -> FormatOutcome {
        self.focus();
        let language = self.language();
        self.with_widget(|w| {
            let content = w.text();
            match format_code(&content, language) {
                None => {
                    tracing::debug!(%language, "Formatting not supported or input invalid");
                    FormatOutcome::NotFormatted
                }
                Some(formatted) if formatted == content => FormatOutcome::Unchanged,
                Some(formatted) => {
                    w.replace_range(0, content.chars().count(), &formatted);
                    FormatOutcome::Formatted
                }
            }
        })
        .unwrap_or(FormatOutcome::NotFormatted)
    }

    /// Formats the selected range only.
    pub fn format_selection(&self) -> FormatOutcome {
        self.focus();
        let language = self.language();
        self.with_widget(|w| {
            let selection = w.selection();
            if selection.is_empty() {
                return FormatOutcome::NotFormatted;
            }
            let selected = slice_chars(&w.text(), selection.from(), selection.to());
            match format_code(&selected, language) {
                None => FormatOutcome::NotFormatted,
                Some(formatted) if formatted == selected => FormatOutcome::Unchanged,
                Some(formatted) => {
                    w.replace_range(selection.from(), selection.to(), &formatted);
                    FormatOutcome::Formatted
                }
            }
        })
        .unwrap_or(FormatOutcome::NotFormatted)
    }

    fn menu_entries(&self) -> Vec<MenuEntry> {
        let has_selection = self.selected_text().is_some();
        vec![
            MenuEntry::item_if(MenuAction::AskAssistant, None, has_selection),
            MenuEntry::Separator,
            MenuEntry::item_if(MenuAction::Cut, Some("Ctrl+X"), has_selection),
            MenuEntry::item_if(MenuAction::Copy, Some("Ctrl+C"), has_selection),
            MenuEntry::item(MenuAction::Paste, Some("Ctrl+V")),
            MenuEntry::Separator,
            MenuEntry::item(MenuAction::SelectAll, Some("Ctrl+A")),
            MenuEntry::Separator,
            MenuEntry::item(MenuAction::FormatDocument, Some("Shift+Alt+F")),
            MenuEntry::item_if(MenuAction::FormatSelection, Some("Ctrl+K Ctrl+F"), has_selection),
        ]
    }

    /// Shows the editor context menu at a pointer position.
    pub fn open_context_menu(&self, at: Point) {
        self.inner.close_menu();
        let weak = self.weak();
        let handle = open_menu(
            self.inner.host.overlays.as_ref(),
            self.menu_entries(),
            at,
            Rc::new(move |action| {
                if let Some(inner) = weak.upgrade() {
                    EditorView { inner }.run_menu_action(action);
                }
            }),
        );
        *self.inner.menu.borrow_mut() = Some(handle);
    }

    /// Returns true while the context menu is open.
    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.inner.menu.borrow().is_some()
    }

    /// Closes the menu and performs the chosen action.
    pub fn run_menu_action(&self, action: MenuAction) -> bool {
        self.inner.close_menu();
        match action {
            MenuAction::AskAssistant => {
                let Some(selection) = self.selected_text() else {
                    return false;
                };
                (self.inner.callbacks.on_external_action)(ExternalAction::AskAssistant {
                    selection,
                    language: self.language(),
                });
                true
            }
            MenuAction::Cut => self.cut(),
            MenuAction::Copy => self.copy(),
            MenuAction::Paste => self.paste(),
            MenuAction::SelectAll => self.select_all(),
            MenuAction::FormatDocument => self.format_document().succeeded(),
            MenuAction::FormatSelection => self.format_selection().succeeded(),
            MenuAction::ClearSelection | MenuAction::Clear => false,
        }
    }
}

impl ViewAdapter for EditorView {
    fn show(&self) {
        self.inner.surface.show();
        self.request_measure();
    }

    fn hide(&self) {
        self.inner.close_menu();
        self.inner.surface.hide();
    }

    fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        self.detach();
        self.inner.surface.remove();
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    fn is_modified(&self) -> bool {
        self.inner.doc.borrow().is_modified
    }

    /// Moves the cursor to the start of a 1-based line, clamped to the
    /// document, and scrolls it into view.
    fn scroll_to_line(&self, line: usize) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.with_widget(|w| {
            let offset = line_start(&w.text(), line);
            w.set_selection(Selection::cursor(offset));
            w.scroll_into_view(offset);
            w.focus();
        })
        .is_some()
    }

    /// Recreates the widget with the document's new language, keeping the
    /// text and the selection.
    fn change_kind(&self) {
        if self.is_destroyed() {
            return;
        }
        let selection = self.selection();
        self.detach();
        self.attach();
        if let Some(selection) = selection {
            let len = self.text().chars().count();
            self.with_widget(|w| {
                w.set_selection(Selection {
                    anchor: selection.anchor.min(len),
                    head: selection.head.min(len),
                });
            });
        }
    }
}
