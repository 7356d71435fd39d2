//! Image and PDF viewer adapter

use std::cell::Cell;
use std::rc::Rc;

use crate::host::{Markup, Surface};
use crate::model::{ContentKind, SharedDocument};

use super::ViewAdapter;

struct ViewerInner {
    doc: SharedDocument,
    surface: Box<dyn Surface>,
    destroyed: Cell<bool>,
}

/// Read-only adapter rendering a binary document from its data URI.
#[derive(Clone)]
pub struct ViewerView {
    inner: Rc<ViewerInner>,
}

impl ViewerView {
    /// Renders the document into the surface.
    #[must_use]
    pub fn new(surface: Box<dyn Surface>, doc: SharedDocument) -> Self {
        let view = Self {
            inner: Rc::new(ViewerInner {
                doc,
                surface,
                destroyed: Cell::new(false),
            }),
        };
        view.render();
        view
    }

    /// Markup for the current document, `None` for non-binary kinds.
    #[must_use]
    pub fn markup(&self) -> Option<Markup> {
        let doc = self.inner.doc.borrow();
        match doc.kind {
            ContentKind::Image => Some(Markup::Image {
                src: doc.content.clone(),
                alt: doc.title.clone(),
            }),
            ContentKind::Pdf => Some(Markup::Pdf {
                src: doc.content.clone(),
            }),
            kind => {
                tracing::warn!(%kind, "Viewer bound to non-binary document");
                None
            }
        }
    }

    fn render(&self) {
        if let Some(markup) = self.markup() {
            self.inner.surface.render(markup);
        }
    }
}

impl ViewAdapter for ViewerView {
    fn show(&self) {
        self.inner.surface.show();
    }

    fn hide(&self) {
        self.inner.surface.hide();
    }

    fn destroy(&self) {
        if !self.inner.destroyed.replace(true) {
            self.inner.surface.remove();
        }
    }

    fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    fn is_modified(&self) -> bool {
        false
    }

    /// Re-renders after switching between image and PDF.
    fn change_kind(&self) {
        if !self.is_destroyed() {
            self.render();
        }
    }
}
