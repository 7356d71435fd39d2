//! Timers and resize observation

use std::rc::Rc;
use std::time::Duration;

use crate::model::{SurfaceId, TimerId};

/// One-shot timer scheduling on the UI loop.
pub trait Scheduler {
    /// Runs `task` once after `delay`
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId;

    /// Cancels a pending timer. Unknown or fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// An active resize observation.
pub trait ObserverHandle {
    /// Stops observing. Calling it twice is harmless.
    fn disconnect(&self);
}

/// Watches surfaces for size changes.
pub trait ResizeObservers {
    /// Calls `callback` whenever the surface is resized
    fn observe(&self, surface: SurfaceId, callback: Rc<dyn Fn()>) -> Box<dyn ObserverHandle>;
}
