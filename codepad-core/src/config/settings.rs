//! Application settings persisted as TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_MODEL;

/// Default maximum number of open tabs
pub const DEFAULT_MAX_TABS: usize = 20;

/// Default title for new documents
pub const DEFAULT_TAB_NAME: &str = "Untitled.txt";

/// Default content for new scratch documents
pub const DEFAULT_TAB_CONTENT: &str = "// New file\n// Start coding here...";

/// Default outline highlight duration in milliseconds
pub const DEFAULT_HIGHLIGHT_MS: u64 = 3000;

/// Default outline refresh debounce in milliseconds
pub const DEFAULT_OUTLINE_DEBOUNCE_MS: u64 = 500;

/// Default search match cap
pub const DEFAULT_MAX_SEARCH_MATCHES: usize = 500;

/// Root settings structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Tab limits and defaults
    pub tabs: TabSettings,
    /// Editor appearance
    pub editor: EditorSettings,
    /// Terminal appearance
    pub terminal: TerminalSettings,
    /// Outline panel behavior
    pub outline: OutlineSettings,
    /// Search limits
    pub search: SearchSettings,
    /// Assistant model selection
    pub assistant: AssistantSettings,
    /// Recently opened files
    pub recent: RecentFiles,
    /// Log output
    pub logging: LoggingSettings,
}

/// Tab limits and defaults for new documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabSettings {
    /// Maximum number of open tabs
    pub max_tabs: usize,
    /// Title given to new documents
    pub default_tab_name: String,
    /// Content of new scratch documents
    pub default_content: String,
}

impl Default for TabSettings {
    fn default() -> Self {
        Self {
            max_tabs: DEFAULT_MAX_TABS,
            default_tab_name: DEFAULT_TAB_NAME.to_string(),
            default_content: DEFAULT_TAB_CONTENT.to_string(),
        }
    }
}

/// Editor font and indentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// CSS font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            font_family: "JetBrains Mono, monospace".to_string(),
            font_size: 14,
            indent_width: 4,
        }
    }
}

impl EditorSettings {
    /// Indentation unit as a string of spaces.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}

/// Terminal font and scrollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// CSS font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Scrollback lines
    pub scrollback: u32,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            font_family: "JetBrains Mono, monospace".to_string(),
            font_size: 14,
            scrollback: 1000,
        }
    }
}

/// Outline panel behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    /// How long a navigated line stays highlighted
    pub highlight_duration_ms: u64,
    /// Delay before re-parsing after an edit
    pub refresh_debounce_ms: u64,
    /// Maximum label length before truncation
    pub max_label_len: usize,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            highlight_duration_ms: DEFAULT_HIGHLIGHT_MS,
            refresh_debounce_ms: DEFAULT_OUTLINE_DEBOUNCE_MS,
            max_label_len: 50,
        }
    }
}

/// Search limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Match cap after which results show a `+` suffix
    pub max_matches: usize,
    /// Default case sensitivity
    pub case_sensitive: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_matches: DEFAULT_MAX_SEARCH_MATCHES,
            case_sensitive: false,
        }
    }
}

/// Assistant model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    /// Model id sent with each query
    pub model: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Most recently opened files, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentFiles {
    /// Paths, newest first
    pub files: Vec<PathBuf>,
    /// Maximum number of entries kept
    pub max_entries: usize,
    /// Directory of the last open or save dialog
    pub last_directory: Option<PathBuf>,
}

impl Default for RecentFiles {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            max_entries: 10,
            last_directory: None,
        }
    }
}

impl RecentFiles {
    /// Moves `path` to the front, dropping duplicates and overflow.
    pub fn push(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.files.retain(|existing| existing != path);
        self.files.insert(0, path.to_path_buf());
        self.files.truncate(self.max_entries);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level name (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
    /// Optional log file; stderr when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let settings = AppSettings::default();
        assert_eq!(settings.tabs.max_tabs, 20);
        assert_eq!(settings.tabs.default_tab_name, "Untitled.txt");
        assert_eq!(settings.outline.highlight_duration_ms, 3000);
        assert_eq!(settings.search.max_matches, 500);
        assert_eq!(settings.editor.indent_unit(), "    ");
    }

    #[test]
    fn recent_files_dedupes_and_caps() {
        let mut recent = RecentFiles {
            max_entries: 2,
            ..RecentFiles::default()
        };
        recent.push("/a/one.txt");
        recent.push("/a/two.txt");
        recent.push("/a/one.txt");
        recent.push("/b/three.txt");
        assert_eq!(
            recent.files,
            vec![PathBuf::from("/b/three.txt"), PathBuf::from("/a/one.txt")]
        );
        assert_eq!(recent.last_directory, Some(PathBuf::from("/b")));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: AppSettings = toml::from_str("[tabs]\nmax_tabs = 5\n").unwrap();
        assert_eq!(settings.tabs.max_tabs, 5);
        assert_eq!(settings.tabs.default_content, DEFAULT_TAB_CONTENT);
        assert_eq!(settings.editor.font_size, 14);
    }
}
