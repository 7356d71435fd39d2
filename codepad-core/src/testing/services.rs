//! In-memory file and startup services

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{ServiceError, ServiceResult};
use crate::model::filename_from_path;
use crate::services::{BinaryFileData, FileService, SaveAsResult, StartupService, TextFileData};

/// File service backed by maps of path to content.
#[derive(Debug, Default)]
pub struct InMemoryFileService {
    texts: RefCell<HashMap<PathBuf, String>>,
    binaries: RefCell<HashMap<PathBuf, BinaryFileData>>,
    writes: RefCell<Vec<(PathBuf, String)>>,
    save_as_target: RefCell<Option<PathBuf>>,
    pick: RefCell<Option<PathBuf>>,
    fail_writes: Cell<bool>,
}

impl InMemoryFileService {
    /// Creates an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text file.
    pub fn insert_text(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.texts.borrow_mut().insert(path.into(), content.into());
    }

    /// Adds a binary file with its base64 payload and MIME type.
    pub fn insert_binary(&self, path: impl Into<PathBuf>, data: &str, mime_type: &str) {
        let payload = BinaryFileData {
            data: data.to_owned(),
            mime_type: mime_type.to_owned(),
            is_image: mime_type.starts_with("image/"),
            is_pdf: mime_type == "application/pdf",
            error: String::new(),
        };
        self.binaries.borrow_mut().insert(path.into(), payload);
    }

    /// Text currently stored at a path.
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.texts.borrow().get(path.as_ref()).cloned()
    }

    /// Every write, in order.
    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.writes.borrow().clone()
    }

    /// Path the next save-as dialog picks. `None` dismisses the dialog.
    pub fn set_save_as_target(&self, path: Option<PathBuf>) {
        *self.save_as_target.borrow_mut() = path;
    }

    /// Path the next open dialog picks. `None` dismisses the dialog.
    pub fn set_pick(&self, path: Option<PathBuf>) {
        *self.pick.borrow_mut() = path;
    }

    /// Makes every write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn store(&self, path: &Path, content: &str) -> ServiceResult<()> {
        if self.fail_writes.get() {
            return Err(ServiceError::Failed(format!(
                "permission denied: {}",
                path.display()
            )));
        }
        self.texts
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_owned());
        self.writes
            .borrow_mut()
            .push((path.to_path_buf(), content.to_owned()));
        Ok(())
    }
}

#[async_trait(?Send)]
impl FileService for InMemoryFileService {
    async fn read_text(&self, path: &Path) -> TextFileData {
        match self.text(path) {
            Some(content) => {
                let name = filename_from_path(&path.to_string_lossy()).to_owned();
                TextFileData::ok(content, name)
            }
            None => TextFileData::failed(format!("file not found: {}", path.display())),
        }
    }

    async fn read_binary(&self, path: &Path) -> BinaryFileData {
        self.binaries
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| BinaryFileData {
                error: format!("file not found: {}", path.display()),
                ..BinaryFileData::default()
            })
    }

    async fn write_text(&self, path: &Path, content: &str) -> ServiceResult<()> {
        self.store(path, content)
    }

    async fn save_as(&self, content: &str, _default_name: &str) -> SaveAsResult {
        let Some(path) = self.save_as_target.borrow().clone() else {
            return SaveAsResult::default();
        };
        match self.store(&path, content) {
            Ok(()) => {
                let path = path.to_string_lossy().into_owned();
                let title = filename_from_path(&path).to_owned();
                SaveAsResult {
                    success: true,
                    path,
                    title,
                    message: None,
                }
            }
            Err(e) => SaveAsResult {
                message: Some(e.to_string()),
                ..SaveAsResult::default()
            },
        }
    }

    async fn pick_file(&self) -> Option<PathBuf> {
        self.pick.borrow().clone()
    }
}

/// Startup service returning a fixed list.
#[derive(Debug, Default, Clone)]
pub struct FakeStartupService {
    files: Vec<PathBuf>,
}

impl FakeStartupService {
    /// Creates a service that reports `files`.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

#[async_trait(?Send)]
impl StartupService for FakeStartupService {
    async fn startup_files(&self) -> Vec<PathBuf> {
        self.files.clone()
    }
}
