//! Recording fakes for surfaces, listeners, overlays, resize observers and
//! timers

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::host::{
    DocumentEvent, DocumentHandler, DocumentListeners, ListenerKind, Markup, MenuAction, MenuEntry,
    MenuSelectHandler, ObserverHandle, OverlayHandle, OverlayHost, Point, Rect, ResizeObservers,
    Scheduler, Size, Sizing, Surface, SurfaceHost, SurfaceRole,
};
use crate::model::{ListenerId, Orientation, SurfaceId, TimerId};

/// Bounds every fake surface reports until changed.
pub const DEFAULT_BOUNDS: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

// ===== Surfaces =====

/// Observable state of one fake surface.
#[derive(Debug)]
pub struct SurfaceRecord {
    id: SurfaceId,
    role: SurfaceRole,
    visible: Cell<bool>,
    removed: Cell<bool>,
    markup: RefCell<Option<Markup>>,
    render_count: Cell<usize>,
    sizing: Cell<Sizing>,
    orientation: Cell<Option<Orientation>>,
    bounds: Cell<Rect>,
}

impl SurfaceRecord {
    /// Surface id.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Role the surface was created with.
    pub fn role(&self) -> SurfaceRole {
        self.role
    }

    /// Returns true if shown.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Returns true once removed.
    pub fn is_removed(&self) -> bool {
        self.removed.get()
    }

    /// Last rendered markup.
    pub fn markup(&self) -> Option<Markup> {
        self.markup.borrow().clone()
    }

    /// Number of render calls.
    pub fn render_count(&self) -> usize {
        self.render_count.get()
    }

    /// Current sizing.
    pub fn sizing(&self) -> Sizing {
        self.sizing.get()
    }

    /// Orientation set on the surface, if any.
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation.get()
    }

    /// Overrides the reported bounds.
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }
}

#[derive(Debug, Default)]
struct SurfaceRegistry {
    next_id: Cell<u64>,
    all: RefCell<Vec<Rc<SurfaceRecord>>>,
}

impl SurfaceRegistry {
    fn create(self: &Rc<Self>, role: SurfaceRole) -> Box<dyn Surface> {
        let id = SurfaceId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        let record = Rc::new(SurfaceRecord {
            id,
            role,
            visible: Cell::new(false),
            removed: Cell::new(false),
            markup: RefCell::new(None),
            render_count: Cell::new(0),
            sizing: Cell::new(Sizing::Flexible),
            orientation: Cell::new(None),
            bounds: Cell::new(DEFAULT_BOUNDS),
        });
        self.all.borrow_mut().push(Rc::clone(&record));
        Box::new(FakeSurface {
            record,
            registry: Rc::clone(self),
        })
    }
}

struct FakeSurface {
    record: Rc<SurfaceRecord>,
    registry: Rc<SurfaceRegistry>,
}

impl Surface for FakeSurface {
    fn id(&self) -> SurfaceId {
        self.record.id
    }

    fn show(&self) {
        self.record.visible.set(true);
    }

    fn hide(&self) {
        self.record.visible.set(false);
    }

    fn is_visible(&self) -> bool {
        self.record.visible.get()
    }

    fn remove(&self) {
        self.record.visible.set(false);
        self.record.removed.set(true);
    }

    fn render(&self, markup: Markup) {
        *self.record.markup.borrow_mut() = Some(markup);
        self.record.render_count.set(self.record.render_count.get() + 1);
    }

    fn set_sizing(&self, sizing: Sizing) {
        self.record.sizing.set(sizing);
    }

    fn set_orientation(&self, orientation: Orientation) {
        self.record.orientation.set(Some(orientation));
    }

    fn bounds(&self) -> Rect {
        self.record.bounds.get()
    }

    fn create_child(&self, role: SurfaceRole) -> Box<dyn Surface> {
        self.registry.create(role)
    }
}

/// Surface host that keeps a record of every surface it created.
#[derive(Debug, Default)]
pub struct FakeSurfaceHost {
    registry: Rc<SurfaceRegistry>,
}

impl FakeSurfaceHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every surface created so far, children included.
    pub fn all(&self) -> Vec<Rc<SurfaceRecord>> {
        self.registry.all.borrow().clone()
    }

    /// Surfaces created with a role.
    pub fn with_role(&self, role: SurfaceRole) -> Vec<Rc<SurfaceRecord>> {
        self.all().into_iter().filter(|s| s.role == role).collect()
    }

    /// Most recent surface created with a role.
    pub fn last(&self, role: SurfaceRole) -> Option<Rc<SurfaceRecord>> {
        self.with_role(role).pop()
    }

    /// Looks up a surface by id.
    pub fn get(&self, id: SurfaceId) -> Option<Rc<SurfaceRecord>> {
        self.all().into_iter().find(|s| s.id == id)
    }

    /// Number of surfaces not yet removed.
    pub fn live_count(&self) -> usize {
        self.all().iter().filter(|s| !s.is_removed()).count()
    }
}

impl SurfaceHost for FakeSurfaceHost {
    fn create_surface(&self, role: SurfaceRole) -> Box<dyn Surface> {
        self.registry.create(role)
    }
}

// ===== Document listeners =====

/// Listener registry that can dispatch synthetic events.
#[derive(Default)]
pub struct FakeDocumentListeners {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(ListenerId, ListenerKind, DocumentHandler)>>,
}

impl FakeDocumentListeners {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners.
    pub fn active_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Number of registered listeners of one kind.
    pub fn count_of(&self, kind: ListenerKind) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    /// Delivers an event to every listener of its kind.
    ///
    /// Handlers may add or remove listeners while the event is delivered.
    pub fn dispatch(&self, event: &DocumentEvent) {
        let kind = event.kind();
        let handlers: Vec<DocumentHandler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }
}

impl DocumentListeners for FakeDocumentListeners {
    fn add(&self, kind: ListenerKind, handler: DocumentHandler) -> ListenerId {
        let id = ListenerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.handlers.borrow_mut().push((id, kind, handler));
        id
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(existing, _, _)| *existing != id);
        handlers.len() != before
    }
}

// ===== Overlays =====

struct MenuRecord {
    entries: Vec<MenuEntry>,
    at: Point,
    on_select: MenuSelectHandler,
    closed: Rc<Cell<bool>>,
}

struct FakeOverlayHandle {
    closed: Rc<Cell<bool>>,
}

impl OverlayHandle for FakeOverlayHandle {
    fn close(&self) {
        self.closed.set(true);
    }
}

/// Overlay host recording every menu shown.
pub struct FakeOverlayHost {
    viewport: Cell<Size>,
    item_height: f64,
    menus: RefCell<Vec<MenuRecord>>,
}

impl Default for FakeOverlayHost {
    fn default() -> Self {
        Self {
            viewport: Cell::new(Size::new(1024.0, 768.0)),
            item_height: 28.0,
            menus: RefCell::new(Vec::new()),
        }
    }
}

impl FakeOverlayHost {
    /// Creates a host with a 1024x768 viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the viewport size.
    pub fn set_viewport(&self, size: Size) {
        self.viewport.set(size);
    }

    /// Number of menus currently open.
    pub fn open_count(&self) -> usize {
        self.menus.borrow().iter().filter(|m| !m.closed.get()).count()
    }

    /// Number of menus ever shown.
    pub fn shown_count(&self) -> usize {
        self.menus.borrow().len()
    }

    /// Entries of the most recent menu.
    pub fn last_entries(&self) -> Vec<MenuEntry> {
        self.menus
            .borrow()
            .last()
            .map(|m| m.entries.clone())
            .unwrap_or_default()
    }

    /// Position of the most recent menu.
    pub fn last_position(&self) -> Option<Point> {
        self.menus.borrow().last().map(|m| m.at)
    }

    /// Chooses an action in the most recent open menu. Returns false if no
    /// menu is open or the action is not an enabled item.
    pub fn select(&self, action: MenuAction) -> bool {
        let handler = self
            .menus
            .borrow()
            .iter()
            .rev()
            .find(|m| !m.closed.get())
            .filter(|m| m.entries.iter().any(|e| e.enabled_action() == Some(action)))
            .map(|m| Rc::clone(&m.on_select));
        match handler {
            Some(handler) => {
                handler(action);
                true
            }
            None => false,
        }
    }
}

impl OverlayHost for FakeOverlayHost {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn menu_size(&self, entries: &[MenuEntry]) -> Size {
        Size::new(180.0, entries.len() as f64 * self.item_height)
    }

    fn show_menu(
        &self,
        entries: Vec<MenuEntry>,
        at: Point,
        on_select: MenuSelectHandler,
    ) -> Box<dyn OverlayHandle> {
        let closed = Rc::new(Cell::new(false));
        self.menus.borrow_mut().push(MenuRecord {
            entries,
            at,
            on_select,
            closed: Rc::clone(&closed),
        });
        Box::new(FakeOverlayHandle { closed })
    }
}

// ===== Resize observers =====

type Observation = (SurfaceId, Rc<dyn Fn()>, Rc<Cell<bool>>);

struct FakeObserverHandle {
    connected: Rc<Cell<bool>>,
}

impl ObserverHandle for FakeObserverHandle {
    fn disconnect(&self) {
        self.connected.set(false);
    }
}

/// Resize observers that fire on demand.
#[derive(Default)]
pub struct FakeResizeObservers {
    observations: RefCell<Vec<Observation>>,
}

impl FakeResizeObservers {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of observations still connected.
    pub fn active_count(&self) -> usize {
        self.observations
            .borrow()
            .iter()
            .filter(|(_, _, connected)| connected.get())
            .count()
    }

    /// Fires every connected observer of a surface.
    pub fn trigger(&self, surface: SurfaceId) {
        let callbacks: Vec<Rc<dyn Fn()>> = self
            .observations
            .borrow()
            .iter()
            .filter(|(id, _, connected)| *id == surface && connected.get())
            .map(|(_, callback, _)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
    }

    /// Fires every connected observer.
    pub fn trigger_all(&self) {
        let surfaces: Vec<SurfaceId> = self.observations.borrow().iter().map(|(id, _, _)| *id).collect();
        for surface in surfaces {
            self.trigger(surface);
        }
    }
}

impl ResizeObservers for FakeResizeObservers {
    fn observe(&self, surface: SurfaceId, callback: Rc<dyn Fn()>) -> Box<dyn ObserverHandle> {
        let connected = Rc::new(Cell::new(true));
        self.observations
            .borrow_mut()
            .push((surface, callback, Rc::clone(&connected)));
        Box::new(FakeObserverHandle { connected })
    }
}

// ===== Scheduler =====

struct PendingTimer {
    id: TimerId,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

/// Manual clock: timers run only when the test advances time.
#[derive(Default)]
pub struct FakeScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    pending: RefCell<Vec<PendingTimer>>,
    cancelled: Cell<usize>,
}

impl FakeScheduler {
    /// Creates a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of timers waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of successful cancellations.
    pub fn cancelled_count(&self) -> usize {
        self.cancelled.get()
    }

    /// Moves the clock forward, running due timers in order.
    ///
    /// Timers scheduled by a running task fire in the same call if they
    /// fall due before the new time.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut pending = self.pending.borrow_mut();
                let index = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= target)
                    .min_by_key(|(_, timer)| (timer.due, timer.id.0))
                    .map(|(index, _)| index);
                index.map(|index| pending.remove(index))
            };
            let Some(timer) = next else {
                break;
            };
            self.now.set(timer.due);
            (timer.task)();
        }
        self.now.set(target);
    }

    /// Runs timers that are already due.
    pub fn run_due(&self) {
        self.advance(Duration::ZERO);
    }
}

impl Scheduler for FakeScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.pending.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get() + delay,
            task,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|timer| timer.id != id);
        if pending.len() != before {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_runs_due_timers_in_order() {
        let scheduler = FakeScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, name) in [(300, "late"), (100, "early"), (100, "early-second")] {
            let log = Rc::clone(&log);
            scheduler.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }
        scheduler.advance(Duration::from_millis(200));
        assert_eq!(*log.borrow(), vec!["early", "early-second"]);
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn cancelled_timer_never_runs() {
        let scheduler = FakeScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let id = scheduler.schedule(Duration::ZERO, Box::new(move || flag.set(true)));
        scheduler.cancel(id);
        scheduler.run_due();
        assert!(!fired.get());
        assert_eq!(scheduler.cancelled_count(), 1);
    }

    #[test]
    fn listener_removed_during_dispatch_is_harmless() {
        let listeners = Rc::new(FakeDocumentListeners::new());
        let id = Rc::new(Cell::new(None));
        let registry = Rc::clone(&listeners);
        let own_id = Rc::clone(&id);
        let added = listeners.add(
            ListenerKind::PointerUp,
            Rc::new(move |_| {
                if let Some(id) = own_id.get() {
                    registry.remove(id);
                }
            }),
        );
        id.set(Some(added));
        listeners.dispatch(&DocumentEvent::PointerUp(Point::default()));
        assert_eq!(listeners.active_count(), 0);
    }
}
