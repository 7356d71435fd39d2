//! View adapters
//!
//! Each tab is rendered by exactly one adapter that owns its host surface,
//! its document-level listeners and any backend sessions it opened. The
//! [`TabView`] enum is the closed set of adapters; [`create_view`] picks
//! one from the tab's content kind.

mod assistant;
mod editor;
mod split;
pub mod split_layout;
mod terminal;
pub mod text;
mod viewer;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{AssistantSettings, EditorSettings, TerminalSettings};
use crate::host::{ExternalAction, HostContext, SurfaceRole};
use crate::model::{ContentKind, Tab};
use crate::registry::{SessionRegistry, ViewKind};

pub use assistant::AssistantView;
pub use editor::{EditorCallbacks, EditorView};
pub use split::{SplitCallbacks, SplitView};
pub use split_layout::SplitLayout;
pub use terminal::TerminalView;
pub use text::Cursor;
pub use viewer::ViewerView;

/// Lifecycle shared by every view adapter.
pub trait ViewAdapter {
    /// Makes the view visible and re-measures its layout
    fn show(&self);

    /// Hides the view, keeping all of its state
    fn hide(&self);

    /// Releases widgets, listeners, subscriptions and backend sessions.
    /// Calling it again has no effect.
    fn destroy(&self);

    /// Returns true once [`ViewAdapter::destroy`] has run
    fn is_destroyed(&self) -> bool;

    /// Returns true if the view holds unsaved changes
    fn is_modified(&self) -> bool;

    /// Scrolls to a 1-based line. Returns false if the view has no lines.
    fn scroll_to_line(&self, _line: usize) -> bool {
        false
    }

    /// Rebuilds the view after its document's content kind changed within
    /// the same adapter family
    fn change_kind(&self);
}

/// Shared dependencies handed to every adapter.
#[derive(Clone)]
pub struct ViewContext {
    /// Host and backend collaborators
    pub host: HostContext,
    /// Identity and session bookkeeping
    pub registry: Rc<RefCell<SessionRegistry>>,
    /// Text widget appearance
    pub editor: EditorSettings,
    /// Terminal appearance
    pub terminal: TerminalSettings,
    /// Assistant model selection
    pub assistant: AssistantSettings,
}

/// Notifications from a view back to its owner.
///
/// The tab's document has already been updated when `on_content_change`
/// fires.
#[derive(Clone)]
pub struct ViewCallbacks {
    /// Content or dirty state changed
    pub on_content_change: Rc<dyn Fn()>,
    /// Cursor moved in the focused editor
    pub on_cursor_change: Rc<dyn Fn(Cursor)>,
    /// A cross-cutting action was requested
    pub on_external_action: Rc<dyn Fn(ExternalAction)>,
}

impl ViewCallbacks {
    /// Callbacks that ignore every notification.
    #[must_use]
    pub fn noop() -> Self {
        Self {
            on_content_change: Rc::new(|| {}),
            on_cursor_change: Rc::new(|_| {}),
            on_external_action: Rc::new(|_| {}),
        }
    }
}

/// The adapter rendering one tab.
#[derive(Clone)]
pub enum TabView {
    /// Plain text editor
    Editor(EditorView),
    /// Two-pane split editor
    Split(SplitView),
    /// Terminal session
    Terminal(TerminalView),
    /// Assistant chat
    Assistant(AssistantView),
    /// Image or PDF viewer
    Viewer(ViewerView),
}

impl TabView {
    fn adapter(&self) -> &dyn ViewAdapter {
        match self {
            Self::Editor(view) => view,
            Self::Split(view) => view,
            Self::Terminal(view) => view,
            Self::Assistant(view) => view,
            Self::Viewer(view) => view,
        }
    }

    /// Registry kind of this view.
    #[must_use]
    pub const fn kind(&self) -> ViewKind {
        match self {
            Self::Editor(_) => ViewKind::Editor,
            Self::Split(_) => ViewKind::Split,
            Self::Terminal(_) => ViewKind::Terminal,
            Self::Assistant(_) => ViewKind::Assistant,
            Self::Viewer(_) => ViewKind::Viewer,
        }
    }

    /// Returns the editor adapter.
    #[must_use]
    pub const fn as_editor(&self) -> Option<&EditorView> {
        match self {
            Self::Editor(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the split adapter.
    #[must_use]
    pub const fn as_split(&self) -> Option<&SplitView> {
        match self {
            Self::Split(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the terminal adapter.
    #[must_use]
    pub const fn as_terminal(&self) -> Option<&TerminalView> {
        match self {
            Self::Terminal(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the assistant adapter.
    #[must_use]
    pub const fn as_assistant(&self) -> Option<&AssistantView> {
        match self {
            Self::Assistant(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the viewer adapter.
    #[must_use]
    pub const fn as_viewer(&self) -> Option<&ViewerView> {
        match self {
            Self::Viewer(view) => Some(view),
            _ => None,
        }
    }

    /// Editor holding keyboard focus: the plain editor, or the focused
    /// pane of a split view.
    #[must_use]
    pub fn focused_editor(&self) -> Option<EditorView> {
        match self {
            Self::Editor(view) => Some(view.clone()),
            Self::Split(view) => view.focused_editor(),
            _ => None,
        }
    }
}

impl ViewAdapter for TabView {
    fn show(&self) {
        self.adapter().show();
    }

    fn hide(&self) {
        self.adapter().hide();
    }

    fn destroy(&self) {
        self.adapter().destroy();
    }

    fn is_destroyed(&self) -> bool {
        self.adapter().is_destroyed()
    }

    fn is_modified(&self) -> bool {
        self.adapter().is_modified()
    }

    fn scroll_to_line(&self, line: usize) -> bool {
        self.adapter().scroll_to_line(line)
    }

    fn change_kind(&self) {
        self.adapter().change_kind();
    }
}

/// Creates and registers the adapter for a tab.
///
/// The new view's surface starts hidden; the caller shows it.
#[must_use]
pub fn create_view(ctx: &ViewContext, tab: &Tab, callbacks: ViewCallbacks) -> TabView {
    let id = tab.id();
    let surface = ctx.host.surfaces.create_surface(SurfaceRole::TabContent);
    let view = match tab.kind() {
        ContentKind::Code(_) => {
            let on_content = Rc::clone(&callbacks.on_content_change);
            TabView::Editor(EditorView::new(
                surface,
                tab.shared_document(),
                ctx.host.clone(),
                ctx.editor.clone(),
                EditorCallbacks {
                    on_content_change: Rc::new(move |_text| on_content()),
                    on_cursor_change: callbacks.on_cursor_change,
                    on_external_action: callbacks.on_external_action,
                },
            ))
        }
        ContentKind::Split => {
            let doc = tab.shared_document();
            let on_content = Rc::clone(&callbacks.on_content_change);
            TabView::Split(SplitView::new(
                id,
                surface,
                tab.split_orientation().unwrap_or_default(),
                ctx.clone(),
                SplitCallbacks {
                    on_content_change: Rc::new(move |modified| {
                        doc.borrow_mut().is_modified = modified;
                        on_content();
                    }),
                    on_cursor_change: callbacks.on_cursor_change,
                    on_external_action: callbacks.on_external_action,
                },
            ))
        }
        ContentKind::Terminal => TabView::Terminal(TerminalView::new(id, surface, ctx.clone())),
        ContentKind::Assistant => TabView::Assistant(AssistantView::new(id, surface, ctx.clone())),
        ContentKind::Image | ContentKind::Pdf => {
            TabView::Viewer(ViewerView::new(surface, tab.shared_document()))
        }
    };
    ctx.registry.borrow_mut().register_view(id, view.kind());
    tracing::debug!(tab_id = %id, kind = %view.kind(), "View created");
    view
}
