//! Tab and pane records
//!
//! The document fields of a tab live in a [`SharedDocument`] so the owning
//! view adapter can mutate content and the dirty flag while the Tab Manager
//! keeps the ordered tab list.

use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::kind::{ContentKind, Orientation};
use super::types::{PaneId, TabId};

/// Document fields shared by tabs and split panes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Display name
    pub title: String,
    /// Current text, or a data URI for binary viewers
    pub content: String,
    /// Content kind driving adapter selection
    pub kind: ContentKind,
    /// Dirty flag
    pub is_modified: bool,
    /// Backing file, absent for unsaved documents
    pub path: Option<PathBuf>,
}

impl Document {
    /// Creates a clean document.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            kind,
            is_modified: false,
            path: None,
        }
    }

    /// Sets the backing path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Title with a trailing `" *"` when the document has unsaved changes.
    #[must_use]
    pub fn display_title(&self) -> String {
        if self.is_modified {
            format!("{} *", self.title)
        } else {
            self.title.clone()
        }
    }

    /// Clears the dirty flag and records where the document was saved.
    pub fn mark_saved(&mut self, path: impl Into<PathBuf>, title: impl Into<String>) {
        self.path = Some(path.into());
        self.title = title.into();
        self.is_modified = false;
    }
}

/// Document handle shared between a record and its view adapter.
pub type SharedDocument = Rc<RefCell<Document>>;

/// One top-level document slot in the workspace.
#[derive(Debug, Clone)]
pub struct Tab {
    id: TabId,
    pub(crate) is_active: bool,
    pub(crate) split_orientation: Option<Orientation>,
    document: SharedDocument,
}

impl Tab {
    pub(crate) fn new(id: TabId, document: Document, split_orientation: Option<Orientation>) -> Self {
        let split_orientation = if document.kind == ContentKind::Split {
            Some(split_orientation.unwrap_or_default())
        } else {
            None
        };
        Self {
            id,
            is_active: false,
            split_orientation,
            document: Rc::new(RefCell::new(document)),
        }
    }

    /// Returns the immutable tab id.
    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    /// Returns true if this is the visible tab.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Orientation requested at creation, split tabs only.
    #[must_use]
    pub const fn split_orientation(&self) -> Option<Orientation> {
        self.split_orientation
    }

    /// Borrows the document fields.
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    /// Returns the shared document handle.
    #[must_use]
    pub fn shared_document(&self) -> SharedDocument {
        Rc::clone(&self.document)
    }

    /// Returns the display name.
    #[must_use]
    pub fn title(&self) -> String {
        self.document.borrow().title.clone()
    }

    /// Returns the current content.
    #[must_use]
    pub fn content(&self) -> String {
        self.document.borrow().content.clone()
    }

    /// Returns the content kind.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.document.borrow().kind
    }

    /// Returns the dirty flag.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.document.borrow().is_modified
    }

    /// Returns the backing path.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.document.borrow().path.clone()
    }

    /// Title with a modified marker.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.document.borrow().display_title()
    }
}

/// One of the two sub-documents of a split view.
#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    document: SharedDocument,
}

impl Pane {
    pub(crate) fn new(id: PaneId, document: Document) -> Self {
        Self {
            id,
            document: Rc::new(RefCell::new(document)),
        }
    }

    /// Returns the pane id.
    #[must_use]
    pub const fn id(&self) -> PaneId {
        self.id
    }

    /// Borrows the document fields.
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub(crate) fn shared_document(&self) -> SharedDocument {
        Rc::clone(&self.document)
    }

    /// Label shown above the pane.
    #[must_use]
    pub fn label(&self) -> String {
        let doc = self.document.borrow();
        if doc.title.is_empty() {
            return "Empty".to_string();
        }
        doc.display_title()
    }
}

/// Arguments for creating a tab. Unset fields use workspace defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTab {
    /// Title, or an `Untitled-N` fallback when empty
    pub title: Option<String>,
    /// Initial content, or the configured scratch content
    pub content: Option<String>,
    /// Backing file
    pub path: Option<PathBuf>,
    /// Content kind, plain text by default
    pub kind: ContentKind,
    /// Initial orientation for split tabs
    pub orientation: Option<Orientation>,
}

impl NewTab {
    /// Creates arguments for an empty scratch document.
    #[must_use]
    pub fn scratch() -> Self {
        Self::default()
    }

    /// Creates arguments for a tab of the given kind.
    #[must_use]
    pub fn of_kind(title: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(String::new()),
            kind,
            ..Self::default()
        }
    }

    /// Creates arguments for a file-backed document.
    #[must_use]
    pub fn file(
        title: impl Into<String>,
        content: impl Into<String>,
        path: impl AsRef<Path>,
        kind: ContentKind,
    ) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            path: Some(path.as_ref().to_path_buf()),
            kind,
            orientation: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: ContentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the split orientation.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }
}

/// Partial update merged onto a tab record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabUpdate {
    /// New title
    pub title: Option<String>,
    /// New content
    pub content: Option<String>,
    /// New kind; triggers an adapter content-kind switch
    pub kind: Option<ContentKind>,
    /// New dirty flag
    pub is_modified: Option<bool>,
    /// New backing path; `Some(None)` clears it
    pub path: Option<Option<PathBuf>>,
}

impl TabUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update applied after a successful save.
    #[must_use]
    pub fn saved(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            path: Some(Some(path.into())),
            is_modified: Some(false),
            ..Self::default()
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the kind.
    #[must_use]
    pub const fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the dirty flag.
    #[must_use]
    pub const fn modified(mut self, is_modified: bool) -> Self {
        self.is_modified = Some(is_modified);
        self
    }

    /// Applies the update, returning the previous kind if it changed.
    pub(crate) fn apply(self, document: &mut Document) -> Option<ContentKind> {
        if let Some(title) = self.title {
            document.title = title;
        }
        if let Some(content) = self.content {
            document.content = content;
        }
        if let Some(is_modified) = self.is_modified {
            document.is_modified = is_modified;
        }
        if let Some(path) = self.path {
            document.path = path;
        }
        match self.kind {
            Some(kind) if kind != document.kind => {
                let previous = document.kind;
                document.kind = kind;
                Some(previous)
            }
            _ => None,
        }
    }
}
