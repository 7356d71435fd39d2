//! In-memory text widgets and terminal emulators

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::host::{
    Selection, Surface, TerminalInput, TerminalOptions, TerminalSize, TerminalWidget,
    TerminalWidgetFactory, TextWidget, TextWidgetFactory, WidgetConfig, WidgetEvent,
    WidgetListener, WidgetPanel,
};
use crate::model::{Language, SurfaceId};
use crate::view::text::slice_chars;

// ===== Text widget =====

#[derive(Debug, Clone)]
struct Snapshot {
    text: String,
    selection: Selection,
}

/// Text widget keeping its document in a `String`.
///
/// Events are emitted synchronously like the embedded widget does, with no
/// internal borrow held while the listener runs.
pub struct FakeTextWidget {
    surface: SurfaceId,
    config: WidgetConfig,
    listener: WidgetListener,
    text: RefCell<String>,
    selection: Cell<Selection>,
    undo_stack: RefCell<Vec<Snapshot>>,
    redo_stack: RefCell<Vec<Snapshot>>,
    highlight: Cell<Option<usize>>,
    panel: Cell<Option<WidgetPanel>>,
    scrolled_to: Cell<Option<usize>>,
    measure_count: Cell<usize>,
    focus_count: Cell<usize>,
    disposed: Cell<bool>,
}

impl FakeTextWidget {
    fn new(surface: SurfaceId, config: WidgetConfig, listener: WidgetListener) -> Self {
        Self {
            surface,
            text: RefCell::new(config.text.clone()),
            config,
            listener,
            selection: Cell::new(Selection::default()),
            undo_stack: RefCell::new(Vec::new()),
            redo_stack: RefCell::new(Vec::new()),
            highlight: Cell::new(None),
            panel: Cell::new(None),
            scrolled_to: Cell::new(None),
            measure_count: Cell::new(0),
            focus_count: Cell::new(0),
            disposed: Cell::new(false),
        }
    }

    fn emit(&self, event: WidgetEvent) {
        if !self.disposed.get() {
            (self.listener)(event);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.borrow().clone(),
            selection: self.selection.get(),
        }
    }

    fn restore(&self, snapshot: Snapshot) {
        let head = snapshot.selection.head;
        *self.text.borrow_mut() = snapshot.text;
        self.selection.set(snapshot.selection);
        let text = self.text.borrow().clone();
        self.emit(WidgetEvent::DocChanged { text, head });
    }

    fn char_len(&self) -> usize {
        self.text.borrow().chars().count()
    }

    /// Surface the widget was mounted into.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Configuration passed at creation.
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Language mode fixed at creation.
    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Current document text.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Highlighted 1-based line.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight.get()
    }

    /// Last opened panel.
    pub fn panel(&self) -> Option<WidgetPanel> {
        self.panel.get()
    }

    /// Last offset scrolled into view.
    pub fn scrolled_to(&self) -> Option<usize> {
        self.scrolled_to.get()
    }

    /// Number of re-measure requests.
    pub fn measure_count(&self) -> usize {
        self.measure_count.get()
    }

    /// Number of focus requests.
    pub fn focus_count(&self) -> usize {
        self.focus_count.get()
    }

    /// Returns true once disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Simulates typing: replaces the selection with `input`.
    pub fn type_text(&self, input: &str) {
        let selection = self.selection.get();
        self.replace_range(selection.from(), selection.to(), input);
    }
}

impl TextWidget for FakeTextWidget {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn selection(&self) -> Selection {
        self.selection.get()
    }

    fn replace_range(&self, from: usize, to: usize, insert: &str) {
        let len = self.char_len();
        let to = to.min(len);
        let from = from.min(to);
        let before = self.snapshot();
        let next = {
            let text = self.text.borrow();
            let mut next = slice_chars(&text, 0, from);
            next.push_str(insert);
            next.push_str(&slice_chars(&text, to, len));
            next
        };
        self.undo_stack.borrow_mut().push(before);
        self.redo_stack.borrow_mut().clear();
        let head = from + insert.chars().count();
        *self.text.borrow_mut() = next.clone();
        self.selection.set(Selection::cursor(head));
        self.emit(WidgetEvent::DocChanged { text: next, head });
    }

    fn set_selection(&self, selection: Selection) {
        let len = self.char_len();
        let clamped = Selection {
            anchor: selection.anchor.min(len),
            head: selection.head.min(len),
        };
        self.selection.set(clamped);
        self.emit(WidgetEvent::SelectionChanged { head: clamped.head });
    }

    fn undo(&self) -> bool {
        let Some(previous) = self.undo_stack.borrow_mut().pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.borrow_mut().push(current);
        self.restore(previous);
        true
    }

    fn redo(&self) -> bool {
        let Some(next) = self.redo_stack.borrow_mut().pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.borrow_mut().push(current);
        self.restore(next);
        true
    }

    fn open_panel(&self, panel: WidgetPanel) {
        self.panel.set(Some(panel));
    }

    fn scroll_into_view(&self, offset: usize) {
        self.scrolled_to.set(Some(offset));
    }

    fn set_line_highlight(&self, line: Option<usize>) {
        self.highlight.set(line);
    }

    fn request_measure(&self) {
        self.measure_count.set(self.measure_count.get() + 1);
    }

    fn focus(&self) {
        self.focus_count.set(self.focus_count.get() + 1);
    }

    fn dispose(&self) {
        self.disposed.set(true);
    }
}

struct TextWidgetHandle(Rc<FakeTextWidget>);

impl TextWidget for TextWidgetHandle {
    fn text(&self) -> String {
        TextWidget::text(self.0.as_ref())
    }

    fn selection(&self) -> Selection {
        self.0.selection()
    }

    fn replace_range(&self, from: usize, to: usize, insert: &str) {
        self.0.replace_range(from, to, insert);
    }

    fn set_selection(&self, selection: Selection) {
        self.0.set_selection(selection);
    }

    fn undo(&self) -> bool {
        self.0.undo()
    }

    fn redo(&self) -> bool {
        self.0.redo()
    }

    fn open_panel(&self, panel: WidgetPanel) {
        self.0.open_panel(panel);
    }

    fn scroll_into_view(&self, offset: usize) {
        self.0.scroll_into_view(offset);
    }

    fn set_line_highlight(&self, line: Option<usize>) {
        self.0.set_line_highlight(line);
    }

    fn request_measure(&self) {
        self.0.request_measure();
    }

    fn focus(&self) {
        self.0.focus();
    }

    fn dispose(&self) {
        self.0.dispose();
    }
}

/// Factory remembering every text widget it created.
#[derive(Default)]
pub struct FakeTextWidgetFactory {
    widgets: RefCell<Vec<Rc<FakeTextWidget>>>,
}

impl FakeTextWidgetFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of widgets created so far.
    pub fn created(&self) -> usize {
        self.widgets.borrow().len()
    }

    /// Most recently created widget.
    pub fn last(&self) -> Option<Rc<FakeTextWidget>> {
        self.widgets.borrow().last().cloned()
    }

    /// Every widget in creation order.
    pub fn all(&self) -> Vec<Rc<FakeTextWidget>> {
        self.widgets.borrow().clone()
    }

    /// Number of widgets not yet disposed.
    pub fn live_count(&self) -> usize {
        self.widgets.borrow().iter().filter(|w| !w.is_disposed()).count()
    }
}

impl TextWidgetFactory for FakeTextWidgetFactory {
    fn create(
        &self,
        surface: &dyn Surface,
        config: WidgetConfig,
        listener: WidgetListener,
    ) -> Box<dyn TextWidget> {
        let widget = Rc::new(FakeTextWidget::new(surface.id(), config, listener));
        self.widgets.borrow_mut().push(Rc::clone(&widget));
        Box::new(TextWidgetHandle(widget))
    }
}

// ===== Terminal widget =====

/// Terminal emulator recording its screen as plain text.
pub struct FakeTerminalWidget {
    options: TerminalOptions,
    on_input: TerminalInput,
    screen: RefCell<String>,
    selection: RefCell<Option<String>>,
    proposed: Cell<Option<TerminalSize>>,
    fit_count: Cell<usize>,
    clear_count: Cell<usize>,
    focus_count: Cell<usize>,
    disposed: Cell<bool>,
}

impl FakeTerminalWidget {
    /// Options passed at creation.
    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// Everything written since the last clear.
    pub fn screen(&self) -> String {
        self.screen.borrow().clone()
    }

    /// Simulates keystrokes.
    pub fn type_input(&self, data: &str) {
        if !self.disposed.get() {
            (self.on_input)(data);
        }
    }

    /// Sets the selected text.
    pub fn set_selection(&self, text: Option<&str>) {
        *self.selection.borrow_mut() = text.map(str::to_owned);
    }

    /// Changes the size reported after fitting. `None` means not laid out.
    pub fn set_proposed_size(&self, size: Option<TerminalSize>) {
        self.proposed.set(size);
    }

    /// Number of fit requests.
    pub fn fit_count(&self) -> usize {
        self.fit_count.get()
    }

    /// Number of screen clears.
    pub fn clear_count(&self) -> usize {
        self.clear_count.get()
    }

    /// Number of focus requests.
    pub fn focus_count(&self) -> usize {
        self.focus_count.get()
    }

    /// Returns true once disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl TerminalWidget for FakeTerminalWidget {
    fn write(&self, data: &str) {
        self.screen.borrow_mut().push_str(data);
    }

    fn selection(&self) -> Option<String> {
        self.selection.borrow().clone().filter(|s| !s.is_empty())
    }

    fn select_all(&self) {
        let screen = self.screen.borrow().clone();
        *self.selection.borrow_mut() = Some(screen);
    }

    fn clear_selection(&self) {
        *self.selection.borrow_mut() = None;
    }

    fn clear(&self) {
        self.screen.borrow_mut().clear();
        self.clear_count.set(self.clear_count.get() + 1);
    }

    fn focus(&self) {
        self.focus_count.set(self.focus_count.get() + 1);
    }

    fn fit(&self) {
        self.fit_count.set(self.fit_count.get() + 1);
    }

    fn proposed_size(&self) -> Option<TerminalSize> {
        self.proposed.get()
    }

    fn dispose(&self) {
        self.disposed.set(true);
    }
}

struct TerminalWidgetHandle(Rc<FakeTerminalWidget>);

impl TerminalWidget for TerminalWidgetHandle {
    fn write(&self, data: &str) {
        self.0.write(data);
    }

    fn selection(&self) -> Option<String> {
        self.0.selection()
    }

    fn select_all(&self) {
        self.0.select_all();
    }

    fn clear_selection(&self) {
        self.0.clear_selection();
    }

    fn clear(&self) {
        self.0.clear();
    }

    fn focus(&self) {
        self.0.focus();
    }

    fn fit(&self) {
        self.0.fit();
    }

    fn proposed_size(&self) -> Option<TerminalSize> {
        self.0.proposed_size()
    }

    fn dispose(&self) {
        self.0.dispose();
    }
}

/// Factory remembering every terminal it created.
#[derive(Default)]
pub struct FakeTerminalWidgetFactory {
    terminals: RefCell<Vec<Rc<FakeTerminalWidget>>>,
}

impl FakeTerminalWidgetFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of terminals created so far.
    pub fn created(&self) -> usize {
        self.terminals.borrow().len()
    }

    /// Most recently created terminal.
    pub fn last(&self) -> Option<Rc<FakeTerminalWidget>> {
        self.terminals.borrow().last().cloned()
    }

    /// Number of terminals not yet disposed.
    pub fn live_count(&self) -> usize {
        self.terminals.borrow().iter().filter(|t| !t.is_disposed()).count()
    }
}

impl TerminalWidgetFactory for FakeTerminalWidgetFactory {
    fn create(
        &self,
        _surface: &dyn Surface,
        options: TerminalOptions,
        on_input: TerminalInput,
    ) -> Box<dyn TerminalWidget> {
        let terminal = Rc::new(FakeTerminalWidget {
            options,
            on_input,
            screen: RefCell::new(String::new()),
            selection: RefCell::new(None),
            proposed: Cell::new(Some(TerminalSize { cols: 80, rows: 24 })),
            fit_count: Cell::new(0),
            clear_count: Cell::new(0),
            focus_count: Cell::new(0),
            disposed: Cell::new(false),
        });
        self.terminals.borrow_mut().push(Rc::clone(&terminal));
        Box::new(TerminalWidgetHandle(terminal))
    }
}
