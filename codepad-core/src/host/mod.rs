//! Host contracts
//!
//! The core never touches the DOM, the embedded widgets or the native
//! bridge directly. Each collaborator is reached through a narrow trait
//! defined here and bundled into a [`HostContext`].

mod chrome;
mod events;
mod overlay;
mod surface;
mod timer;
mod widget;

use std::rc::Rc;

use crate::backend::{AssistantBackend, ClipboardBridge, TerminalBackend};

pub use chrome::{
    ExternalAction, NoopObserver, NotificationHold, NotificationQueue, TabStrip, WorkspaceObserver,
};
pub use events::{DocumentEvent, DocumentHandler, DocumentListeners, ListenerKind, ListenerSet};
pub use overlay::{
    MENU_EDGE_MARGIN, MenuAction, MenuEntry, MenuSelectHandler, OverlayHandle, OverlayHost,
    open_menu, place_menu,
};
pub use surface::{Markup, Point, Rect, Size, Sizing, Surface, SurfaceHost, SurfaceRole};
pub use timer::{ObserverHandle, ResizeObservers, Scheduler};
pub use widget::{
    Selection, TerminalInput, TerminalOptions, TerminalSize, TerminalWidget,
    TerminalWidgetFactory, TextWidget, TextWidgetFactory, WidgetConfig, WidgetEvent,
    WidgetListener, WidgetPanel,
};

/// Every host and backend collaborator a view adapter may need.
#[derive(Clone)]
pub struct HostContext {
    /// Creates tab content surfaces
    pub surfaces: Rc<dyn SurfaceHost>,
    /// Document-level listener registry
    pub listeners: Rc<dyn DocumentListeners>,
    /// Context menu host
    pub overlays: Rc<dyn OverlayHost>,
    /// Resize observation
    pub resize: Rc<dyn ResizeObservers>,
    /// UI loop timers
    pub scheduler: Rc<dyn Scheduler>,
    /// Text widget factory
    pub text_widgets: Rc<dyn TextWidgetFactory>,
    /// Terminal widget factory
    pub terminals: Rc<dyn TerminalWidgetFactory>,
    /// Host clipboard bridge
    pub clipboard: Rc<dyn ClipboardBridge>,
    /// Terminal session backend
    pub terminal_backend: Rc<dyn TerminalBackend>,
    /// Assistant query backend
    pub assistant_backend: Rc<dyn AssistantBackend>,
}
