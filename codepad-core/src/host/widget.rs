//! Embedded text widget and terminal emulator contracts
//!
//! Offsets are character offsets into the widget's text.

use std::rc::Rc;

use crate::model::Language;

use super::surface::Surface;

/// Anchor and head of the primary selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Fixed end
    pub anchor: usize,
    /// Moving end, where the cursor is
    pub head: usize,
}

impl Selection {
    /// Collapsed selection at an offset.
    #[must_use]
    pub const fn cursor(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Start of the selected range.
    #[must_use]
    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// End of the selected range.
    #[must_use]
    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// Change notification emitted synchronously by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Document text changed
    DocChanged {
        /// Full text after the change
        text: String,
        /// Cursor offset after the change
        head: usize,
    },
    /// Selection moved without a text change
    SelectionChanged {
        /// Cursor offset
        head: usize,
    },
}

/// Widget event listener.
pub type WidgetListener = Rc<dyn Fn(WidgetEvent)>;

/// Built-in widget panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetPanel {
    /// Find panel
    Search,
    /// Find and replace panel
    Replace,
    /// Go to line prompt
    GotoLine,
}

/// Configuration applied when a text widget is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Initial document text
    pub text: String,
    /// Language mode
    pub language: Language,
    /// CSS font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Indentation unit inserted by Tab
    pub indent_unit: String,
}

/// An embedded text-editing widget instance.
///
/// The language mode is fixed at creation; switching languages means
/// disposing the widget and creating a new one.
pub trait TextWidget {
    /// Full document text
    fn text(&self) -> String;

    /// Primary selection
    fn selection(&self) -> Selection;

    /// Replaces a range and emits [`WidgetEvent::DocChanged`]
    fn replace_range(&self, from: usize, to: usize, insert: &str);

    /// Moves the selection and emits [`WidgetEvent::SelectionChanged`]
    fn set_selection(&self, selection: Selection);

    /// Undoes the last change. Returns false if history is empty.
    fn undo(&self) -> bool;

    /// Redoes the last undone change. Returns false if nothing to redo.
    fn redo(&self) -> bool;

    /// Opens a built-in panel
    fn open_panel(&self, panel: WidgetPanel);

    /// Scrolls so the offset is centered
    fn scroll_into_view(&self, offset: usize);

    /// Highlights a 1-based line, or clears the highlight
    fn set_line_highlight(&self, line: Option<usize>);

    /// Re-measures layout after a container size change
    fn request_measure(&self);

    /// Gives keyboard focus to the widget
    fn focus(&self);

    /// Releases the widget
    fn dispose(&self);
}

/// Creates text widgets mounted into a surface.
pub trait TextWidgetFactory {
    /// Creates a widget that reports changes through `listener`
    fn create(
        &self,
        surface: &dyn Surface,
        config: WidgetConfig,
        listener: WidgetListener,
    ) -> Box<dyn TextWidget>;
}

/// Options for a terminal emulator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalOptions {
    /// CSS font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Scrollback lines kept in memory
    pub scrollback: u32,
}

/// Terminal screen dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    /// Columns
    pub cols: u16,
    /// Rows
    pub rows: u16,
}

/// Keystroke callback from the terminal widget.
pub type TerminalInput = Rc<dyn Fn(&str)>;

/// An embedded terminal emulator instance.
pub trait TerminalWidget {
    /// Writes raw output to the screen buffer
    fn write(&self, data: &str);

    /// Selected text, if any
    fn selection(&self) -> Option<String>;

    /// Selects the whole buffer
    fn select_all(&self);

    /// Drops the selection
    fn clear_selection(&self);

    /// Clears the screen
    fn clear(&self);

    /// Gives keyboard focus to the terminal
    fn focus(&self);

    /// Fits the screen to its container
    fn fit(&self);

    /// Dimensions that fit the container, if it has been laid out
    fn proposed_size(&self) -> Option<TerminalSize>;

    /// Releases the terminal
    fn dispose(&self);
}

/// Creates terminal widgets mounted into a surface.
pub trait TerminalWidgetFactory {
    /// Creates a terminal that forwards keystrokes to `on_input`
    fn create(
        &self,
        surface: &dyn Surface,
        options: TerminalOptions,
        on_input: TerminalInput,
    ) -> Box<dyn TerminalWidget>;
}
