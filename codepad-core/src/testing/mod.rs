//! Test doubles for every host and backend contract
//!
//! [`FakeHost`] bundles one of each fake behind shared handles, so a test
//! can build a [`HostContext`] for the code under test and still inspect
//! and drive the fakes afterwards.

mod backend;
mod chrome;
mod host;
mod services;
mod widget;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppSettings;
use crate::host::{HostContext, SurfaceHost, SurfaceRole};
use crate::manager::TabManager;
use crate::model::{Document, content_kind_for};
use crate::registry::SessionRegistry;
use crate::view::{EditorCallbacks, EditorView, ViewContext};

pub use backend::{FakeAssistantBackend, FakeClipboard, FakeTerminalBackend, Submission};
pub use chrome::{RecordingObserver, RecordingTabStrip};
pub use host::{
    DEFAULT_BOUNDS, FakeDocumentListeners, FakeOverlayHost, FakeResizeObservers, FakeScheduler,
    FakeSurfaceHost, SurfaceRecord,
};
pub use services::{FakeStartupService, InMemoryFileService};
pub use widget::{
    FakeTerminalWidget, FakeTerminalWidgetFactory, FakeTextWidget, FakeTextWidgetFactory,
};

/// One of every fake, shared with the contexts built from it.
#[derive(Clone, Default)]
pub struct FakeHost {
    /// Surface host
    pub surfaces: Rc<FakeSurfaceHost>,
    /// Document listeners
    pub listeners: Rc<FakeDocumentListeners>,
    /// Context menu host
    pub overlays: Rc<FakeOverlayHost>,
    /// Resize observers
    pub resize: Rc<FakeResizeObservers>,
    /// Manual clock
    pub scheduler: Rc<FakeScheduler>,
    /// Text widget factory
    pub widgets: Rc<FakeTextWidgetFactory>,
    /// Terminal widget factory
    pub terminals: Rc<FakeTerminalWidgetFactory>,
    /// Clipboard
    pub clipboard: Rc<FakeClipboard>,
    /// Terminal backend
    pub terminal_backend: Rc<FakeTerminalBackend>,
    /// Assistant backend
    pub assistant_backend: Rc<FakeAssistantBackend>,
    /// Tab strip
    pub strip: Rc<RecordingTabStrip>,
    /// Workspace observer
    pub observer: Rc<RecordingObserver>,
}

impl FakeHost {
    /// Creates a host with fresh fakes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host context wired to the fakes.
    pub fn context(&self) -> HostContext {
        HostContext {
            surfaces: self.surfaces.clone(),
            listeners: self.listeners.clone(),
            overlays: self.overlays.clone(),
            resize: self.resize.clone(),
            scheduler: self.scheduler.clone(),
            text_widgets: self.widgets.clone(),
            terminals: self.terminals.clone(),
            clipboard: self.clipboard.clone(),
            terminal_backend: self.terminal_backend.clone(),
            assistant_backend: self.assistant_backend.clone(),
        }
    }

    /// View context with default settings and a fresh registry.
    pub fn view_context(&self) -> ViewContext {
        let settings = AppSettings::default();
        ViewContext {
            host: self.context(),
            registry: Rc::new(RefCell::new(SessionRegistry::new())),
            editor: settings.editor,
            terminal: settings.terminal,
            assistant: settings.assistant,
        }
    }

    /// Standalone editor over a document whose language follows `title`.
    pub fn editor(&self, title: &str, text: &str) -> EditorView {
        let document = Document::new(title, text, content_kind_for(title));
        EditorView::new(
            self.surfaces.create_surface(SurfaceRole::TabContent),
            Rc::new(RefCell::new(document)),
            self.context(),
            AppSettings::default().editor,
            EditorCallbacks::noop(),
        )
    }

    /// Tab manager wired to the fakes.
    pub fn manager(&self, settings: &AppSettings) -> TabManager {
        TabManager::new(
            self.context(),
            self.strip.clone(),
            self.observer.clone(),
            settings,
        )
    }
}
