//! Layout model for a two-pane split
//!
//! Tracks orientation, the focused pane and the divider position. The
//! divider is either flexible (each pane takes half) or an explicit ratio
//! along the split axis, clamped so neither pane collapses.

use crate::error::ValidationError;
use crate::host::{Point, Rect, Sizing};
use crate::model::Orientation;

/// Number of panes in a split view.
pub const PANE_COUNT: usize = 2;

/// Default divider position (50% of available space).
pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;

/// Minimum divider position.
pub const MIN_SPLIT_RATIO: f64 = 0.10;

/// Maximum divider position.
pub const MAX_SPLIT_RATIO: f64 = 0.90;

/// Orientation, focus and divider position of a split view.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLayout {
    orientation: Orientation,
    focused: usize,
    /// `None` while both panes use flexible sizing
    ratio: Option<f64>,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self::new(Orientation::default())
    }
}

impl SplitLayout {
    /// Creates a flexible layout with the first pane focused.
    #[must_use]
    pub const fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            focused: 0,
            ratio: None,
        }
    }

    /// Current orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Index of the focused pane.
    #[must_use]
    pub const fn focused(&self) -> usize {
        self.focused
    }

    /// Explicit divider ratio, or `None` when flexible.
    #[must_use]
    pub const fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    /// Focuses a pane.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PaneIndexOutOfRange` if `index` is not a pane.
    pub fn set_focus(&mut self, index: usize) -> Result<(), ValidationError> {
        if index < PANE_COUNT {
            self.focused = index;
            Ok(())
        } else {
            Err(ValidationError::PaneIndexOutOfRange(index))
        }
    }

    /// Flips the orientation and returns both panes to flexible sizing.
    pub fn toggle_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.toggled();
        self.ratio = None;
        self.orientation
    }

    /// Converts a pointer position into a raw ratio along the split axis.
    ///
    /// Vertical splits place panes side by side, so the x coordinate is
    /// used; horizontal splits stack them and use y. Degenerate bounds
    /// yield the default ratio.
    #[must_use]
    pub fn ratio_at(&self, pointer: Point, bounds: Rect) -> f64 {
        let (offset, extent) = match self.orientation {
            Orientation::Vertical => (pointer.x - bounds.left, bounds.width),
            Orientation::Horizontal => (pointer.y - bounds.top, bounds.height),
        };
        if extent <= 0.0 {
            return DEFAULT_SPLIT_RATIO;
        }
        offset / extent
    }

    /// Applies a raw ratio, clamped to [`MIN_SPLIT_RATIO`, `MAX_SPLIT_RATIO`].
    /// Returns the ratio that was applied.
    pub fn set_ratio(&mut self, raw: f64) -> f64 {
        let clamped = if raw.is_nan() {
            DEFAULT_SPLIT_RATIO
        } else {
            raw.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
        };
        self.ratio = Some(clamped);
        clamped
    }

    /// Sizing for the first and second pane.
    #[must_use]
    pub fn pane_sizing(&self) -> [Sizing; PANE_COUNT] {
        match self.ratio {
            None => [Sizing::Flexible, Sizing::Flexible],
            Some(ratio) => [
                Sizing::Percent(ratio * 100.0),
                Sizing::Percent((1.0 - ratio) * 100.0),
            ],
        }
    }
}
