//! Project-wide text search

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::config::SearchSettings;
use crate::error::{ServiceError, ValidationError, WorkspaceResult};
use crate::tracing::span_names;

/// One matching line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchMatch {
    /// Full path of the file
    pub file_path: String,
    /// File name
    pub file_name: String,
    /// 1-based line number
    pub line_number: usize,
    /// Line text, possibly shortened around the match
    pub line_text: String,
    /// Offset of the match inside `line_text`
    pub match_start: usize,
}

/// Raw search payload. `error` is empty on success.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    /// Query as sent
    pub query: String,
    /// Absolute root searched
    pub root_path: String,
    /// Matches in walk order
    pub matches: Vec<SearchMatch>,
    /// Number of files scanned
    pub total_files: usize,
    /// Error message, empty on success
    pub error: String,
}

/// Text search through the native bridge.
#[async_trait(?Send)]
pub trait SearchService {
    /// Searches every text file under `root`
    async fn search_in_directory(&self, root: &str, query: &str, case_sensitive: bool)
    -> SearchResult;
}

/// Matches of one file, in line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMatches {
    /// Full path
    pub file_path: String,
    /// File name
    pub file_name: String,
    /// Matching lines
    pub matches: Vec<SearchMatch>,
}

/// A successful search ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    /// Raw result
    pub result: SearchResult,
    /// Cap applied by the backend
    pub max_matches: usize,
}

impl SearchSummary {
    /// Number of matches.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.result.matches.len()
    }

    /// Match count, with a `+` once the cap was hit.
    #[must_use]
    pub fn match_label(&self) -> String {
        let count = self.match_count();
        if count >= self.max_matches {
            format!("{count}+")
        } else {
            count.to_string()
        }
    }

    /// Groups matches by file, keeping the order files were first seen.
    #[must_use]
    pub fn by_file(&self) -> Vec<FileMatches> {
        let mut groups: Vec<FileMatches> = Vec::new();
        for found in &self.result.matches {
            match groups.iter_mut().find(|g| g.file_path == found.file_path) {
                Some(group) => group.matches.push(found.clone()),
                None => groups.push(FileMatches {
                    file_path: found.file_path.clone(),
                    file_name: found.file_name.clone(),
                    matches: vec![found.clone()],
                }),
            }
        }
        groups
    }
}

/// Runs a search after validating the query.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyQuery`] for a blank query without calling
/// the service, or the service's error message.
pub async fn search(
    service: &dyn SearchService,
    root: &str,
    query: &str,
    settings: &SearchSettings,
) -> WorkspaceResult<SearchSummary> {
    if query.trim().is_empty() {
        return Err(ValidationError::EmptyQuery.into());
    }
    let span = tracing::info_span!(
        span_names::SEARCH_EXECUTE,
        root,
        query,
        case_sensitive = settings.case_sensitive
    );
    let result = service
        .search_in_directory(root, query, settings.case_sensitive)
        .instrument(span)
        .await;

    if !result.error.is_empty() {
        tracing::warn!(error = %result.error, "Search failed");
        return Err(ServiceError::Failed(result.error).into());
    }
    tracing::info!(matches = result.matches.len(), files = result.total_files, "Search finished");
    Ok(SearchSummary {
        result,
        max_matches: settings.max_matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkspaceError;

    struct CannedSearch(SearchResult);

    #[async_trait(?Send)]
    impl SearchService for CannedSearch {
        async fn search_in_directory(&self, _: &str, _: &str, _: bool) -> SearchResult {
            self.0.clone()
        }
    }

    fn found(file: &str, line: usize) -> SearchMatch {
        SearchMatch {
            file_path: format!("/p/{file}"),
            file_name: file.into(),
            line_number: line,
            ..SearchMatch::default()
        }
    }

    #[tokio::test]
    async fn blank_query_is_rejected_locally() {
        let service = CannedSearch(SearchResult::default());
        let result = search(&service, "/p", "  ", &SearchSettings::default()).await;
        assert!(matches!(
            result,
            Err(WorkspaceError::Validation(ValidationError::EmptyQuery))
        ));
    }

    #[tokio::test]
    async fn service_error_is_surfaced() {
        let service = CannedSearch(SearchResult {
            error: "bad root".into(),
            ..SearchResult::default()
        });
        let result = search(&service, "/p", "x", &SearchSettings::default()).await;
        assert!(matches!(result, Err(WorkspaceError::Service(_))));
    }

    #[test]
    fn label_gets_plus_at_cap() {
        let summary = SearchSummary {
            result: SearchResult {
                matches: vec![found("a", 1), found("a", 2)],
                ..SearchResult::default()
            },
            max_matches: 2,
        };
        assert_eq!(summary.match_label(), "2+");

        let under = SearchSummary {
            max_matches: 500,
            ..summary
        };
        assert_eq!(under.match_label(), "2");
    }

    #[test]
    fn matches_group_by_file_in_first_seen_order() {
        let summary = SearchSummary {
            result: SearchResult {
                matches: vec![found("b.rs", 3), found("a.rs", 1), found("b.rs", 9)],
                ..SearchResult::default()
            },
            max_matches: 500,
        };
        let groups = summary.by_file();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].file_name, "b.rs");
        assert_eq!(groups[0].matches.len(), 2);
        assert_eq!(groups[1].file_name, "a.rs");
    }
}
