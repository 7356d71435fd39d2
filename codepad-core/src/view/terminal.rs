//! Terminal adapter
//!
//! Binds a terminal emulator widget to a backend pseudo-terminal session
//! keyed by the tab id. Keystrokes go to the backend verbatim; output and
//! exit notifications come back through per-tab subscriptions that live
//! exactly as long as the adapter.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::backend::{exit_trailer, start_failure_line};
use crate::host::{
    HostContext, ListenerKind, ListenerSet, MenuAction, MenuEntry, ObserverHandle, OverlayHandle,
    Point, Surface, SurfaceRole, TerminalOptions, TerminalSize, TerminalWidget, open_menu,
};
use crate::model::{SubscriptionId, TabId, TimerId};
use crate::registry::BackendSession;
use crate::tracing::span_names;

use super::{ViewAdapter, ViewContext};

/// Delay before the first fit, so the container has been laid out
const INITIAL_FIT_DELAY: Duration = Duration::from_millis(0);

/// Delay before the initial size is sent to a freshly started session
const INITIAL_RESIZE_DELAY: Duration = Duration::from_millis(100);

struct TerminalInner {
    tab_id: TabId,
    surface: Box<dyn Surface>,
    panel: Box<dyn Surface>,
    ctx: ViewContext,
    widget: RefCell<Option<Box<dyn TerminalWidget>>>,
    listeners: RefCell<ListenerSet>,
    menu: RefCell<Option<Box<dyn OverlayHandle>>>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
    observer: RefCell<Option<Box<dyn ObserverHandle>>>,
    timers: RefCell<Vec<TimerId>>,
    running: Cell<bool>,
    destroyed: Cell<bool>,
}

impl TerminalInner {
    fn host(&self) -> &HostContext {
        &self.ctx.host
    }

    fn write_screen(&self, data: &str) {
        if self.destroyed.get() {
            return;
        }
        if let Some(widget) = self.widget.borrow().as_deref() {
            widget.write(data);
        }
    }

    fn send_input(&self, data: &str) {
        if self.destroyed.get() {
            return;
        }
        if let Err(e) = self.host().terminal_backend.write(self.tab_id, data) {
            tracing::warn!(%e, tab_id = %self.tab_id, "Terminal write failed");
        }
    }

    fn fit(&self) {
        if let Some(widget) = self.widget.borrow().as_deref() {
            widget.fit();
        }
    }

    fn proposed_size(&self) -> Option<TerminalSize> {
        self.widget
            .borrow()
            .as_deref()
            .and_then(|widget| widget.proposed_size())
            .filter(|size| size.cols > 0 && size.rows > 0)
    }

    /// Sends the widget's proposed size to the backend.
    fn sync_size(&self) -> Option<TerminalSize> {
        if self.destroyed.get() {
            return None;
        }
        let size = self.proposed_size()?;
        if let Err(e) = self
            .host()
            .terminal_backend
            .resize(self.tab_id, size.cols, size.rows)
        {
            if self.destroyed.get() {
                tracing::debug!(%e, tab_id = %self.tab_id, "Resize after teardown ignored");
            } else {
                tracing::warn!(%e, tab_id = %self.tab_id, "Terminal resize failed");
            }
        }
        Some(size)
    }

    fn close_menu(&self) {
        let handle = self.menu.borrow_mut().take();
        if let Some(handle) = handle {
            handle.close();
        }
    }

    fn schedule(self: &Rc<Self>, delay: Duration, task: impl FnOnce(&Self) + 'static) {
        let weak = Rc::downgrade(self);
        let id = self.host().scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if !inner.destroyed.get() {
                        task(&inner);
                    }
                }
            }),
        );
        self.timers.borrow_mut().push(id);
    }
}

/// Adapter owning one terminal widget and its backend session.
#[derive(Clone)]
pub struct TerminalView {
    inner: Rc<TerminalInner>,
}

impl TerminalView {
    /// Creates the widget, subscribes to the session's output and starts it.
    ///
    /// A start failure is written to the screen in red; the view stays
    /// usable and can be closed normally.
    #[must_use]
    pub fn new(tab_id: TabId, surface: Box<dyn Surface>, ctx: ViewContext) -> Self {
        let _span = tracing::info_span!(span_names::TERMINAL_START, tab_id = %tab_id).entered();
        let panel = surface.create_child(SurfaceRole::Terminal);
        let listeners = ListenerSet::new(Rc::clone(&ctx.host.listeners));
        let inner = Rc::new(TerminalInner {
            tab_id,
            surface,
            panel,
            ctx,
            widget: RefCell::new(None),
            listeners: RefCell::new(listeners),
            menu: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            timers: RefCell::new(Vec::new()),
            running: Cell::new(false),
            destroyed: Cell::new(false),
        });
        let view = Self { inner };
        view.setup_widget();
        view.register_events();
        view.start_session();
        view
    }

    fn weak(&self) -> Weak<TerminalInner> {
        Rc::downgrade(&self.inner)
    }

    fn setup_widget(&self) {
        let inner = &self.inner;
        let settings = &inner.ctx.terminal;
        let options = TerminalOptions {
            font_family: settings.font_family.clone(),
            font_size: settings.font_size,
            scrollback: settings.scrollback,
        };
        let weak = self.weak();
        let widget = inner.host().terminals.create(
            inner.panel.as_ref(),
            options,
            Rc::new(move |data| {
                if let Some(inner) = weak.upgrade() {
                    inner.send_input(data);
                }
            }),
        );
        *inner.widget.borrow_mut() = Some(widget);
        inner.schedule(INITIAL_FIT_DELAY, TerminalInner::fit);

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
        drop(listeners);

        let weak = self.weak();
        let observer = inner.host().resize.observe(
            inner.panel.id(),
            Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if !inner.destroyed.get() {
                        inner.fit();
                        inner.sync_size();
                    }
                }
            }),
        );
        *inner.observer.borrow_mut() = Some(observer);
    }

    fn register_events(&self) {
        let backend = &self.inner.host().terminal_backend;
        let tab_id = self.inner.tab_id;

        let weak = self.weak();
        let output = backend.subscribe_output(
            tab_id,
            Rc::new(move |data| {
                if let Some(inner) = weak.upgrade() {
                    if !data.is_empty() {
                        inner.write_screen(data);
                    }
                }
            }),
        );
        let weak = self.weak();
        let exit = backend.subscribe_exit(
            tab_id,
            Rc::new(move |code| {
                if let Some(inner) = weak.upgrade() {
                    inner.running.set(false);
                    inner.write_screen(&exit_trailer(code));
                }
            }),
        );
        self.inner.subscriptions.borrow_mut().extend([output, exit]);
    }

    fn start_session(&self) {
        let inner = &self.inner;
        match inner.host().terminal_backend.start(inner.tab_id) {
            Ok(()) => {
                inner.running.set(true);
                inner
                    .ctx
                    .registry
                    .borrow_mut()
                    .record_session(inner.tab_id, BackendSession::Terminal);
                inner.schedule(INITIAL_RESIZE_DELAY, |inner| {
                    inner.sync_size();
                });
                tracing::info!(tab_id = %inner.tab_id, "Terminal session started");
            }
            Err(e) => {
                tracing::error!(%e, tab_id = %inner.tab_id, "Failed to start terminal");
                inner.write_screen(&start_failure_line(&e.to_string()));
            }
        }
    }

    /// Tab this terminal belongs to.
    #[must_use]
    pub fn tab_id(&self) -> TabId {
        self.inner.tab_id
    }

    /// Returns true while the backend session is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Forwards keystrokes to the session.
    pub fn send_input(&self, data: &str) {
        self.inner.send_input(data);
    }

    /// Fits the screen and sends the new size to the session.
    pub fn fit(&self) -> Option<TerminalSize> {
        self.inner.fit();
        self.inner.sync_size()
    }

    fn menu_entries(&self) -> Vec<MenuEntry> {
        let has_selection = self
            .inner
            .widget
            .borrow()
            .as_deref()
            .and_then(|widget| widget.selection())
            .is_some_and(|text| !text.is_empty());
        vec![
            MenuEntry::item_if(MenuAction::Copy, Some("Ctrl+Shift+C"), has_selection),
            MenuEntry::item(MenuAction::Paste, Some("Ctrl+Shift+V")),
            MenuEntry::Separator,
            MenuEntry::item(MenuAction::SelectAll, Some("Ctrl+Shift+A")),
            MenuEntry::item_if(MenuAction::ClearSelection, None, has_selection),
            MenuEntry::Separator,
            MenuEntry::item(MenuAction::Clear, None),
        ]
    }

    /// Shows the terminal context menu at a pointer position.
    pub fn open_context_menu(&self, at: Point) {
        if self.is_destroyed() {
            return;
        }
        self.inner.close_menu();
        let weak = self.weak();
        let handle = open_menu(
            self.inner.host().overlays.as_ref(),
            self.menu_entries(),
            at,
            Rc::new(move |action| {
                if let Some(inner) = weak.upgrade() {
                    TerminalView { inner }.run_menu_action(action);
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
        let inner = &self.inner;
        let widget = inner.widget.borrow();
        let Some(widget) = widget.as_deref() else {
            return false;
        };
        match action {
            MenuAction::Copy => {
                let Some(text) = widget.selection().filter(|text| !text.is_empty()) else {
                    return false;
                };
                if let Err(e) = inner.host().clipboard.set_text(&text) {
                    tracing::warn!(%e, "Terminal clipboard copy failed");
                    return false;
                }
                true
            }
            MenuAction::Paste => match inner.host().clipboard.get_text() {
                Ok(text) if !text.is_empty() => {
                    inner.send_input(&text);
                    true
                }
                Ok(_) => false,
                Err(e) => {
                    tracing::warn!(%e, "Terminal clipboard paste failed");
                    false
                }
            },
            MenuAction::SelectAll => {
                widget.select_all();
                true
            }
            MenuAction::ClearSelection => {
                widget.clear_selection();
                true
            }
            MenuAction::Clear => {
                widget.clear();
                true
            }
            _ => false,
        }
    }
}

impl ViewAdapter for TerminalView {
    fn show(&self) {
        self.inner.surface.show();
        if self.is_destroyed() {
            return;
        }
        self.fit();
        if let Some(widget) = self.inner.widget.borrow().as_deref() {
            widget.focus();
        }
    }

    fn hide(&self) {
        self.inner.close_menu();
        self.inner.surface.hide();
    }

    /// Releases everything the terminal acquired. Safe to call repeatedly;
    /// only the first call touches the backend.
    fn destroy(&self) {
        let inner = &self.inner;
        if inner.destroyed.replace(true) {
            return;
        }
        let _span =
            tracing::info_span!(span_names::TERMINAL_DESTROY, tab_id = %inner.tab_id).entered();
        let host = inner.host();

        for id in inner.subscriptions.borrow_mut().drain(..) {
            host.terminal_backend.unsubscribe(id);
        }
        for id in inner.timers.borrow_mut().drain(..) {
            host.scheduler.cancel(id);
        }
        inner.close_menu();
        inner.listeners.borrow_mut().remove_all();

        if let Err(e) = host.terminal_backend.stop(inner.tab_id) {
            tracing::debug!(%e, tab_id = %inner.tab_id, "Terminal stop failed");
        }
        inner.running.set(false);
        inner
            .ctx
            .registry
            .borrow_mut()
            .release_session(inner.tab_id, BackendSession::Terminal);

        let observer = inner.observer.borrow_mut().take();
        if let Some(observer) = observer {
            observer.disconnect();
        }
        let widget = inner.widget.borrow_mut().take();
        if let Some(widget) = widget {
            widget.dispose();
        }
        inner.surface.remove();
        tracing::info!(tab_id = %inner.tab_id, "Terminal destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    fn is_modified(&self) -> bool {
        false
    }

    fn change_kind(&self) {}
}
