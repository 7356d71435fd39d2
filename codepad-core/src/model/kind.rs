//! Content kinds and language tags
//!
//! A tab's [`ContentKind`] selects the view adapter that owns it. Code tabs
//! additionally carry a [`Language`] used to configure the text widget.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language tag for code and text documents.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Plain text, no highlighting
    #[default]
    Text,
    JavaScript,
    Html,
    Css,
    Json,
    Xml,
    Yaml,
    Toml,
    Ini,
    Python,
    Markdown,
    Go,
    Java,
    Cpp,
    C,
    CSharp,
    Php,
    Ruby,
    Swift,
    Kotlin,
    Rust,
    Lua,
    Perl,
    Bash,
    Batch,
    PowerShell,
    Sql,
    R,
    Matlab,
    Fortran,
    Csv,
}

impl Language {
    /// Returns the lowercase tag the host widget understands.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::JavaScript => "javascript",
            Self::Html => "html",
            Self::Css => "css",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Ini => "ini",
            Self::Python => "python",
            Self::Markdown => "markdown",
            Self::Go => "go",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::CSharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Rust => "rust",
            Self::Lua => "lua",
            Self::Perl => "perl",
            Self::Bash => "bash",
            Self::Batch => "batch",
            Self::PowerShell => "powershell",
            Self::Sql => "sql",
            Self::R => "r",
            Self::Matlab => "matlab",
            Self::Fortran => "fortran",
            Self::Csv => "csv",
        }
    }

    /// Returns true for brace-delimited languages the indentation
    /// normalizer understands.
    #[must_use]
    pub const fn is_brace_delimited(self) -> bool {
        matches!(self, Self::JavaScript | Self::Html | Self::Css)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Split view orientation.
///
/// `Vertical` places the panes side by side with a vertical divider,
/// `Horizontal` stacks them with a horizontal divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Panes side by side
    #[default]
    Vertical,
    /// Panes stacked
    Horizontal,
}

impl Orientation {
    /// Returns the other orientation.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// Discriminator selecting the view adapter for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "language")]
pub enum ContentKind {
    /// Source or text document edited in the text widget
    Code(Language),
    /// Image shown from a data URI
    Image,
    /// PDF shown from a data URI
    Pdf,
    /// Assistant chat panel
    Assistant,
    /// Interactive terminal
    Terminal,
    /// Two-pane split editor
    Split,
}

impl Default for ContentKind {
    fn default() -> Self {
        Self::Code(Language::Text)
    }
}

impl ContentKind {
    /// Returns the language for code tabs.
    #[must_use]
    pub const fn language(self) -> Option<Language> {
        match self {
            Self::Code(language) => Some(language),
            _ => None,
        }
    }

    /// Returns true if the kind holds a document that can be saved.
    ///
    /// Assistant and terminal tabs have no persisted document.
    #[must_use]
    pub const fn is_savable(self) -> bool {
        !matches!(self, Self::Assistant | Self::Terminal)
    }

    /// Returns true for binary viewer kinds.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Image | Self::Pdf)
    }

    /// Returns true if both kinds are served by the same adapter family,
    /// so a switch between them can be handled in place.
    #[must_use]
    pub fn same_adapter(self, other: Self) -> bool {
        match (self, other) {
            (Self::Code(_), Self::Code(_)) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(language) => write!(f, "{language}"),
            Self::Image => f.write_str("image"),
            Self::Pdf => f.write_str("pdf"),
            Self::Assistant => f.write_str("ai"),
            Self::Terminal => f.write_str("terminal"),
            Self::Split => f.write_str("split"),
        }
    }
}
