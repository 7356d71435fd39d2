//! Context menu overlays

use std::fmt;
use std::rc::Rc;

use super::surface::{Point, Size};

/// Margin kept between a menu and the viewport edge.
pub const MENU_EDGE_MARGIN: f64 = 10.0;

/// Action behind a context menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Ask the assistant about the selection
    AskAssistant,
    /// Cut the selection
    Cut,
    /// Copy the selection
    Copy,
    /// Paste from the host clipboard
    Paste,
    /// Select everything
    SelectAll,
    /// Drop the current selection
    ClearSelection,
    /// Clear the terminal screen
    Clear,
    /// Format the whole document
    FormatDocument,
    /// Format the selected range
    FormatSelection,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AskAssistant => "Ask AI...",
            Self::Cut => "Cut",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::SelectAll => "Select All",
            Self::ClearSelection => "Clear Selection",
            Self::Clear => "Clear",
            Self::FormatDocument => "Format Document",
            Self::FormatSelection => "Format Selection",
        };
        f.write_str(label)
    }
}

/// One row of a context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Selectable item
    Item {
        /// Action performed on selection
        action: MenuAction,
        /// Keyboard shortcut hint
        shortcut: Option<&'static str>,
        /// Disabled items are shown greyed out
        enabled: bool,
    },
    /// Visual separator
    Separator,
}

impl MenuEntry {
    /// Creates an enabled item.
    #[must_use]
    pub const fn item(action: MenuAction, shortcut: Option<&'static str>) -> Self {
        Self::Item {
            action,
            shortcut,
            enabled: true,
        }
    }

    /// Creates an item enabled only when `enabled` holds.
    #[must_use]
    pub const fn item_if(action: MenuAction, shortcut: Option<&'static str>, enabled: bool) -> Self {
        Self::Item {
            action,
            shortcut,
            enabled,
        }
    }

    /// Returns the action if this is an enabled item.
    #[must_use]
    pub const fn enabled_action(&self) -> Option<MenuAction> {
        match self {
            Self::Item {
                action,
                enabled: true,
                ..
            } => Some(*action),
            _ => None,
        }
    }
}

/// Callback invoked with the chosen action.
pub type MenuSelectHandler = Rc<dyn Fn(MenuAction)>;

/// A menu currently displayed by the host.
pub trait OverlayHandle {
    /// Removes the menu. Calling it twice is harmless.
    fn close(&self);
}

/// Host that displays context menus above the editor region.
pub trait OverlayHost {
    /// Size of the viewport
    fn viewport(&self) -> Size;

    /// Size the menu will occupy once rendered
    fn menu_size(&self, entries: &[MenuEntry]) -> Size;

    /// Displays a menu at a position already clamped to the viewport
    fn show_menu(
        &self,
        entries: Vec<MenuEntry>,
        at: Point,
        on_select: MenuSelectHandler,
    ) -> Box<dyn OverlayHandle>;
}

/// Moves a menu so it stays inside the viewport with a margin.
#[must_use]
pub fn place_menu(at: Point, menu: Size, viewport: Size) -> Point {
    let mut x = at.x;
    let mut y = at.y;
    if x + menu.width > viewport.width {
        x = viewport.width - menu.width - MENU_EDGE_MARGIN;
    }
    if y + menu.height > viewport.height {
        y = viewport.height - menu.height - MENU_EDGE_MARGIN;
    }
    Point::new(x.max(MENU_EDGE_MARGIN), y.max(MENU_EDGE_MARGIN))
}

/// Shows a menu through the host, clamped to the viewport.
pub fn open_menu(
    host: &dyn OverlayHost,
    entries: Vec<MenuEntry>,
    at: Point,
    on_select: MenuSelectHandler,
) -> Box<dyn OverlayHandle> {
    let position = place_menu(at, host.menu_size(&entries), host.viewport());
    host.show_menu(entries, position, on_select)
}
