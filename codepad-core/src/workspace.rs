//! Workspace flows that await services and then update tabs
//!
//! Every flow reads what it needs from the [`TabManager`], releases the
//! borrow, awaits the service and only then borrows the manager again.
//! No `RefCell` borrow is ever held across an await point.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::Instrument;

use crate::config::RecentFiles;
use crate::error::{ValidationError, WorkspaceError, WorkspaceResult};
use crate::host::ExternalAction;
use crate::manager::TabManager;
use crate::model::{
    ContentKind, Language, NewTab, TabId, content_kind_for, data_uri,
    filename_from_path, mime_type_for,
};
use crate::services::{FileService, SaveAsOutcome, StartupService};
use crate::tracing::span_names;
use crate::view::{SplitView, ViewAdapter};

/// Title of the tab created for assistant questions.
pub const ASSISTANT_TAB_TITLE: &str = "AI Assistant";

/// Result of a save request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Content was written to this path
    Saved(PathBuf),
    /// The save dialog was dismissed
    Cancelled,
    /// Nothing needed saving
    Skipped,
}

/// Prompt prefilled when asking the assistant about a selection.
#[must_use]
pub fn explain_prompt(selection: &str, language: Language) -> String {
    format!("Explain this {language} code:\n\n```{language}\n{selection}\n```")
}

/// Shared handle to the tab manager plus the services the flows need.
pub struct Workspace {
    tabs: Rc<RefCell<TabManager>>,
    files: Rc<dyn FileService>,
    startup: Rc<dyn StartupService>,
    recent: RefCell<RecentFiles>,
}

impl Workspace {
    /// Wraps a tab manager.
    #[must_use]
    pub fn new(
        tabs: TabManager,
        files: Rc<dyn FileService>,
        startup: Rc<dyn StartupService>,
        recent: RecentFiles,
    ) -> Self {
        Self {
            tabs: Rc::new(RefCell::new(tabs)),
            files,
            startup,
            recent: RefCell::new(recent),
        }
    }

    /// Shared tab manager.
    #[must_use]
    pub fn tabs(&self) -> Rc<RefCell<TabManager>> {
        Rc::clone(&self.tabs)
    }

    /// Recently opened or saved files, newest first.
    #[must_use]
    pub fn recent_files(&self) -> RecentFiles {
        self.recent.borrow().clone()
    }

    /// Runs `f` on the manager. Observer notifications it raises are
    /// delivered after the borrow is released.
    fn with_tabs<R>(&self, f: impl FnOnce(&mut TabManager) -> R) -> R {
        let hold = self.tabs.borrow().hold_notifications();
        let result = f(&mut self.tabs.borrow_mut());
        drop(hold);
        result
    }

    fn remember(&self, path: &Path) {
        self.recent.borrow_mut().push(path);
    }

    /// Opens a file in a new tab, optionally scrolling to a 1-based line.
    ///
    /// Images and PDFs are loaded as data URIs into a viewer tab; anything
    /// else opens in an editor with the language detected from the
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns the service error if the file cannot be read, or
    /// [`WorkspaceError::TabLimitReached`] if no tab could be created.
    pub async fn open_file_by_path(&self, path: &Path, line: Option<usize>) -> WorkspaceResult<TabId> {
        let span = tracing::info_span!(span_names::FILE_OPEN, path = %path.display());
        self.open_file(path, line).instrument(span).await
    }

    async fn open_file(&self, path: &Path, line: Option<usize>) -> WorkspaceResult<TabId> {
        let kind = content_kind_for(path);
        let display = path.to_string_lossy();
        let title = filename_from_path(&display).to_string();

        let content = if kind.is_binary() {
            let data = self
                .files
                .read_binary(path)
                .await
                .into_result()
                .inspect_err(|e| tracing::error!(%e, "Error reading binary file"))?;
            let mime = if data.mime_type.is_empty() {
                mime_type_for(path).unwrap_or("application/octet-stream")
            } else {
                data.mime_type.as_str()
            };
            data_uri(mime, &data.data)
        } else {
            self.files
                .read_text(path)
                .await
                .into_result()
                .inspect_err(|e| tracing::error!(%e, "Error reading file"))?
                .content
        };

        let id = self.with_tabs(|tabs| {
            let id = tabs
                .create_tab(NewTab::file(title, content, path, kind))
                .ok_or(WorkspaceError::TabLimitReached)?;
            if let Some(line) = line {
                tabs.scroll_to_line(line);
            }
            Ok::<_, WorkspaceError>(id)
        })?;
        self.remember(path);
        tracing::info!(tab_id = %id, %kind, "File opened");
        Ok(id)
    }

    /// Lets the user pick a file and opens it.
    ///
    /// # Errors
    ///
    /// See [`Workspace::open_file_by_path`].
    pub async fn open_file_dialog(&self) -> WorkspaceResult<Option<TabId>> {
        match self.files.pick_file().await {
            Some(path) => self.open_file_by_path(&path, None).await.map(Some),
            None => Ok(None),
        }
    }

    /// Opens the files handed over at startup, in order.
    ///
    /// A file that fails to open is logged and skipped.
    pub async fn open_startup_files(&self) -> Vec<TabId> {
        let paths = self.startup.startup_files().await;
        let mut opened = Vec::with_capacity(paths.len());
        for path in paths {
            match self.open_file_by_path(&path, None).await {
                Ok(id) => opened.push(id),
                Err(e) => tracing::warn!(%e, path = %path.display(), "Skipping startup file"),
            }
        }
        opened
    }

    fn active_split(&self) -> WorkspaceResult<(TabId, SplitView)> {
        let tabs = self.tabs.borrow();
        let id = tabs.active_tab_id().ok_or(WorkspaceError::NoActiveTab)?;
        let split = tabs
            .view(id)
            .and_then(|view| view.as_split().cloned())
            .ok_or(WorkspaceError::NotSplit(id))?;
        Ok((id, split))
    }

    /// Saves the active tab.
    ///
    /// A tab with a path is written in place; one without goes through
    /// save-as. A split tab saves its focused pane, and only if that pane
    /// has unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoActiveTab`] or the service error.
    pub async fn save_active(&self) -> WorkspaceResult<SaveOutcome> {
        self.save(false).await
    }

    /// Saves the active tab under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::NoActiveTab`] or the service error.
    pub async fn save_active_as(&self) -> WorkspaceResult<SaveOutcome> {
        self.save(true).await
    }

    async fn save(&self, force_dialog: bool) -> WorkspaceResult<SaveOutcome> {
        let (id, kind) = {
            let tabs = self.tabs.borrow();
            let tab = tabs.get_active_tab().ok_or(WorkspaceError::NoActiveTab)?;
            (tab.id(), tab.kind())
        };
        if kind == ContentKind::Split {
            return self.save_focused_pane(force_dialog).await;
        }
        if !kind.is_savable() || kind.is_binary() {
            tracing::debug!(tab_id = %id, %kind, "Nothing to save");
            return Ok(SaveOutcome::Skipped);
        }

        let (title, content, path) = {
            let tabs = self.tabs.borrow();
            let tab = tabs.get_tab(id).ok_or(WorkspaceError::NoActiveTab)?;
            (tab.title(), tab.content(), tab.path())
        };
        let span = tracing::info_span!(span_names::FILE_SAVE, tab_id = %id);
        let (path, title) = match self
            .write_or_prompt(&content, &title, path.filter(|_| !force_dialog))
            .instrument(span)
            .await?
        {
            Some(saved) => saved,
            None => return Ok(SaveOutcome::Cancelled),
        };

        self.with_tabs(|tabs| tabs.mark_saved(id, path.clone(), &title));
        self.remember(&path);
        Ok(SaveOutcome::Saved(path))
    }

    async fn save_focused_pane(&self, force_dialog: bool) -> WorkspaceResult<SaveOutcome> {
        let (id, split) = self.active_split()?;
        let pane = split.focused_pane_data();
        if !pane.is_modified && !force_dialog {
            tracing::debug!(tab_id = %id, "Focused pane has no changes");
            return Ok(SaveOutcome::Skipped);
        }

        let span = tracing::info_span!(span_names::FILE_SAVE, tab_id = %id, pane = split.focused_index());
        let target = pane.path.clone().filter(|_| !force_dialog);
        let Some((path, title)) = self
            .write_or_prompt(&pane.content, &pane.title, target)
            .instrument(span)
            .await?
        else {
            return Ok(SaveOutcome::Cancelled);
        };

        split.mark_focused_pane_saved(path.clone(), title);
        self.remember(&path);
        Ok(SaveOutcome::Saved(path))
    }

    /// Writes to `path`, or asks for one. `None` when the dialog was dismissed.
    async fn write_or_prompt(
        &self,
        content: &str,
        title: &str,
        path: Option<PathBuf>,
    ) -> WorkspaceResult<Option<(PathBuf, String)>> {
        if let Some(path) = path {
            self.files
                .write_text(&path, content)
                .await
                .inspect_err(|e| tracing::error!(%e, "Error saving file"))?;
            tracing::info!(path = %path.display(), "File saved");
            return Ok(Some((path, title.to_string())));
        }
        match self.files.save_as(content, title).await.into_outcome()? {
            SaveAsOutcome::Saved { path, title } => {
                tracing::info!(path = %path.display(), "File saved as");
                Ok(Some((path, title)))
            }
            SaveAsOutcome::Cancelled => Ok(None),
        }
    }

    /// Loads a text file into one pane of the active split tab.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedPaneContent`] for images and
    /// PDFs, [`WorkspaceError::NotSplit`] if the active tab has no split
    /// view, or the service error.
    pub async fn load_file_into_pane(&self, pane: usize, path: &Path) -> WorkspaceResult<()> {
        let kind = content_kind_for(path);
        if kind.language().is_none() {
            return Err(ValidationError::UnsupportedPaneContent(kind.to_string()).into());
        }
        let (_, split) = self.active_split()?;
        let span = tracing::info_span!(span_names::FILE_OPEN, path = %path.display(), pane);
        let data = self
            .files
            .read_text(path)
            .instrument(span)
            .await
            .into_result()
            .inspect_err(|e| tracing::error!(%e, "Error loading file into pane"))?;
        let display = path.to_string_lossy();
        let title = filename_from_path(&display);
        split.load_file_in_pane(pane, title, &data.content, kind, Some(path.to_path_buf()))?;
        self.remember(path);
        Ok(())
    }

    /// Opens the assistant tab, creating it if needed, with a prompt about
    /// the selection prefilled.
    ///
    /// Returns `None` if no assistant tab exists and the tab limit is
    /// reached.
    pub fn ask_assistant_about(&self, selection: &str, language: Language) -> Option<TabId> {
        self.with_tabs(|tabs| {
            let existing = tabs
                .get_all_tabs()
                .iter()
                .find(|tab| tab.kind() == ContentKind::Assistant)
                .map(|tab| tab.id());
            let id = match existing {
                Some(id) => {
                    tabs.set_active_tab(id);
                    id
                }
                None => {
                    tabs.create_tab(NewTab::of_kind(ASSISTANT_TAB_TITLE, ContentKind::Assistant))?
                }
            };
            if let Some(view) = tabs.view(id)
                && let Some(assistant) = view.as_assistant()
            {
                assistant.set_prompt(explain_prompt(selection, language));
            }
            Some(id)
        })
    }

    /// Runs an action a view requested through the workspace observer.
    ///
    /// # Errors
    ///
    /// Returns the error of the flow the action started.
    pub async fn handle_external_action(&self, action: ExternalAction) -> WorkspaceResult<()> {
        match action {
            ExternalAction::AskAssistant {
                selection,
                language,
            } => {
                self.ask_assistant_about(&selection, language)
                    .ok_or(WorkspaceError::TabLimitReached)?;
                Ok(())
            }
            ExternalAction::OpenFileInPane { pane } => match self.files.pick_file().await {
                Some(path) => self.load_file_into_pane(pane, &path).await,
                None => Ok(()),
            },
        }
    }
}
