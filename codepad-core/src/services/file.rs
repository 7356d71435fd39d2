//! File content service and its payload records

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Text file payload. `error` is empty on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextFileData {
    /// File text
    pub content: String,
    /// File name without directories
    pub filename: String,
    /// Error message, empty on success
    pub error: String,
}

impl TextFileData {
    /// Successful payload.
    #[must_use]
    pub fn ok(content: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
            error: String::new(),
        }
    }

    /// Failed payload.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }

    /// Converts the `error` field into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Failed`] with the service's message.
    pub fn into_result(self) -> ServiceResult<Self> {
        if self.error.is_empty() {
            Ok(self)
        } else {
            Err(ServiceError::Failed(self.error))
        }
    }
}

/// Binary file payload with base64 data. `error` is empty on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinaryFileData {
    /// Base64-encoded content
    pub data: String,
    /// Detected MIME type
    pub mime_type: String,
    /// True for image files
    pub is_image: bool,
    /// True for PDF files
    pub is_pdf: bool,
    /// Error message, empty on success
    pub error: String,
}

impl BinaryFileData {
    /// Converts the `error` field into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Failed`] with the service's message, or
    /// [`ServiceError::EmptyResponse`] if no data came back.
    pub fn into_result(self) -> ServiceResult<Self> {
        if !self.error.is_empty() {
            return Err(ServiceError::Failed(self.error));
        }
        if self.data.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(self)
    }
}

/// Result of a save-as dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveAsResult {
    /// True if the file was written
    pub success: bool,
    /// Full path chosen by the user
    pub path: String,
    /// File name, used as the tab title
    pub title: String,
    /// Error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What a save-as dialog ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveAsOutcome {
    /// Written to `path`
    Saved {
        /// Full path
        path: PathBuf,
        /// New tab title
        title: String,
    },
    /// The user dismissed the dialog
    Cancelled,
}

impl SaveAsResult {
    /// Interprets the payload. A result with neither success nor a message
    /// is a cancelled dialog.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Failed`] if the service reported a message
    /// without success.
    pub fn into_outcome(self) -> ServiceResult<SaveAsOutcome> {
        if self.success {
            return Ok(SaveAsOutcome::Saved {
                path: PathBuf::from(self.path),
                title: self.title,
            });
        }
        match self.message.filter(|m| !m.is_empty()) {
            Some(message) => Err(ServiceError::Failed(message)),
            None => Ok(SaveAsOutcome::Cancelled),
        }
    }
}

/// File access through the native bridge.
#[async_trait(?Send)]
pub trait FileService {
    /// Reads a text file
    async fn read_text(&self, path: &Path) -> TextFileData;

    /// Reads a binary file as base64
    async fn read_binary(&self, path: &Path) -> BinaryFileData;

    /// Overwrites a file with `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    async fn write_text(&self, path: &Path, content: &str) -> ServiceResult<()>;

    /// Asks the user for a target path and writes `content` there
    async fn save_as(&self, content: &str, default_name: &str) -> SaveAsResult;

    /// Asks the user for a file to open. `None` if the dialog was dismissed.
    async fn pick_file(&self) -> Option<PathBuf>;
}
