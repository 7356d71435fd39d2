//! Surfaces: the host-owned subtrees a view renders into

use crate::backend::ChatMessage;
use crate::model::{Orientation, SurfaceId};

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Size {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding rectangle of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// How a pane surface is sized along the split axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Sizing {
    /// Shares the space evenly with its sibling
    #[default]
    Flexible,
    /// Explicit share in percent
    Percent(f64),
}

/// Purpose of a surface, so the host can style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// Top-level wrapper for one tab's content
    TabContent,
    /// One side of a split view
    SplitPane(usize),
    /// Draggable split divider
    SplitDivider,
    /// Title label above a split pane
    PaneLabel(usize),
    /// Mount point for an embedded text widget
    Editor,
    /// Mount point for a terminal widget
    Terminal,
}

/// Structured content rendered by the host instead of raw HTML.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    /// Image element
    Image {
        /// Data URI
        src: String,
        /// Alternative text
        alt: String,
    },
    /// Embedded PDF document
    Pdf {
        /// Data URI
        src: String,
    },
    /// Single line of text
    Label(String),
    /// Assistant chat transcript
    Transcript {
        /// Messages in order
        messages: Vec<ChatMessage>,
        /// Whether a response is streaming
        working: bool,
    },
}

/// One host subtree exclusively owned by a view adapter.
pub trait Surface {
    /// Stable id of this surface
    fn id(&self) -> SurfaceId;

    /// Makes the subtree visible
    fn show(&self);

    /// Hides the subtree without discarding it
    fn hide(&self);

    /// Returns true if the subtree is displayed
    fn is_visible(&self) -> bool;

    /// Detaches the subtree from the document
    fn remove(&self);

    /// Replaces the subtree's content
    fn render(&self, markup: Markup);

    /// Sets sizing along the parent's split axis
    fn set_sizing(&self, sizing: Sizing);

    /// Lays out children along the given orientation
    fn set_orientation(&self, orientation: Orientation);

    /// Current bounding rectangle
    fn bounds(&self) -> Rect;

    /// Creates a child surface
    fn create_child(&self, role: SurfaceRole) -> Box<dyn Surface>;
}

/// Creates top-level surfaces inside the editor region.
pub trait SurfaceHost {
    /// Creates a hidden surface for the given role
    fn create_surface(&self, role: SurfaceRole) -> Box<dyn Surface>;
}
