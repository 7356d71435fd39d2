//! Directory listing service

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// One entry of a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileEntry {
    /// File name
    pub name: String,
    /// Full path
    pub path: String,
    /// True for directories
    pub is_directory: bool,
    /// Size in bytes
    pub size: u64,
    /// Extension without the dot, empty for directories
    pub extension: String,
}

/// Contents of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryListing {
    /// Absolute directory path
    pub path: String,
    /// Parent directory, empty at the filesystem root
    pub parent: String,
    /// Visible entries
    pub entries: Vec<FileEntry>,
    /// Error message, empty on success
    pub error: String,
}

impl DirectoryListing {
    /// Converts the `error` field into a `Result` and sorts the entries.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Failed`] with the service's message.
    pub fn into_result(mut self) -> ServiceResult<Self> {
        if !self.error.is_empty() {
            return Err(ServiceError::Failed(self.error));
        }
        sort_entries(&mut self.entries);
        Ok(self)
    }

    /// Returns true at the filesystem root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Orders directories first, then files, each case-insensitively by name.
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| match (a.is_directory, b.is_directory) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
}

/// Directory browsing through the native bridge.
#[async_trait(?Send)]
pub trait DirectoryService {
    /// Lists a directory, or the home directory for an empty path
    async fn list(&self, path: &str) -> DirectoryListing;

    /// The user's home directory
    async fn home_directory(&self) -> String;

    /// Renames a file or directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    async fn rename(&self, from: &str, to: &str) -> ServiceResult<()>;

    /// Deletes a file or an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn delete(&self, path: &str) -> ServiceResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_directory: bool) -> FileEntry {
        FileEntry {
            name: name.into(),
            is_directory,
            ..FileEntry::default()
        }
    }

    #[test]
    fn directories_sort_before_files() {
        let listing = DirectoryListing {
            entries: vec![
                entry("b.txt", false),
                entry("src", true),
                entry("A.md", false),
                entry("Docs", true),
            ],
            ..DirectoryListing::default()
        };
        let names: Vec<_> = listing
            .into_result()
            .expect("no error")
            .entries
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Docs", "src", "A.md", "b.txt"]);
    }

    #[test]
    fn listing_error_is_surfaced() {
        let listing = DirectoryListing {
            error: "cannot read".into(),
            ..DirectoryListing::default()
        };
        assert_eq!(
            listing.into_result(),
            Err(ServiceError::Failed("cannot read".into()))
        );
    }

    #[test]
    fn listing_payload_is_camel_case() {
        let listing: DirectoryListing = serde_json::from_str(
            r#"{"path":"/","parent":"","entries":[{"name":"etc","path":"/etc","isDirectory":true,"size":0}]}"#,
        )
        .expect("valid payload");
        assert!(listing.is_root());
        assert!(listing.entries[0].is_directory);
    }
}
