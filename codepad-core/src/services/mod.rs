//! Async service contracts
//!
//! Request/response calls to the native backend. Each returns the backend's
//! payload record; records carrying an `error` field convert into a
//! [`ServiceResult`](crate::error::ServiceResult) through `into_result`.
//! The UI loop is single-threaded, so the futures are not `Send`.

mod directory;
mod file;
mod search;
mod settings;

use std::path::PathBuf;

use async_trait::async_trait;

pub use directory::{DirectoryListing, DirectoryService, FileEntry, sort_entries};
pub use file::{BinaryFileData, FileService, SaveAsOutcome, SaveAsResult, TextFileData};
pub use search::{FileMatches, SearchMatch, SearchResult, SearchService, SearchSummary, search};
pub use settings::{EditorFont, SettingsService, VISIBLE_SECRET_CHARS, mask_secret};

/// Files passed on the command line or forwarded by a second instance.
#[async_trait(?Send)]
pub trait StartupService {
    /// Paths to open once the UI is ready, in order
    async fn startup_files(&self) -> Vec<PathBuf>;
}
