//! File type detection by extension

use std::path::Path;

use super::kind::{ContentKind, Language};

/// Maps a lowercase extension to a content kind.
fn kind_for_extension(ext: &str) -> ContentKind {
    let language = match ext {
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => Language::JavaScript,
        "html" | "htm" | "xhtml" => Language::Html,
        "css" | "scss" | "sass" | "less" => Language::Css,
        "json" | "json5" => Language::Json,
        "xml" => Language::Xml,
        "yaml" | "yml" => Language::Yaml,
        "toml" => Language::Toml,
        "ini" | "cfg" | "conf" => Language::Ini,
        "py" | "pyw" | "pyc" | "pyo" => Language::Python,
        "md" | "markdown" | "mdown" => Language::Markdown,
        "go" => Language::Go,
        "java" | "class" | "jar" => Language::Java,
        "cpp" | "vala" | "cc" | "cxx" | "c++" | "hpp" | "hxx" => Language::Cpp,
        "c" | "h" => Language::C,
        "cs" => Language::CSharp,
        "php" | "php3" | "php4" | "php5" | "phtml" => Language::Php,
        "rb" => Language::Ruby,
        "swift" => Language::Swift,
        "kt" | "kts" => Language::Kotlin,
        "rs" => Language::Rust,
        "lua" => Language::Lua,
        "pl" | "pm" => Language::Perl,
        "sh" | "bash" | "zsh" | "fish" => Language::Bash,
        "bat" | "cmd" => Language::Batch,
        "ps1" => Language::PowerShell,
        "sql" => Language::Sql,
        "r" => Language::R,
        "m" => Language::Matlab,
        "f" | "f90" | "f95" => Language::Fortran,
        "csv" | "tsv" => Language::Csv,
        "jpg" | "jpeg" | "jfif" | "pjpeg" | "pjp" | "png" | "gif" | "bmp" | "ico" | "svg"
        | "svgz" | "webp" | "tiff" | "tif" | "psd" | "ai" | "eps" | "raw" | "cr2" | "nef"
        | "orf" | "sr2" => return ContentKind::Image,
        "pdf" => return ContentKind::Pdf,
        _ => Language::Text,
    };
    ContentKind::Code(language)
}

/// Detects the content kind of a file from its extension.
///
/// Unknown or missing extensions open as plain text.
#[must_use]
pub fn content_kind_for(path: impl AsRef<Path>) -> ContentKind {
    let lossy = path.as_ref().to_string_lossy();
    let name = filename_from_path(&lossy);
    match name.rsplit_once('.') {
        Some((_, ext)) => kind_for_extension(&ext.to_lowercase()),
        None => ContentKind::Code(Language::Text),
    }
}

/// Returns the MIME type for a binary viewer file, if known.
#[must_use]
pub fn mime_type_for(path: impl AsRef<Path>) -> Option<&'static str> {
    let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" | "pjpeg" | "pjp" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "svg" | "svgz" => "image/svg+xml",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(mime)
}

/// Extracts the file name from a path using either separator.
///
/// `"/home/user/notes.txt"` and `"C:\\notes.txt"` both yield `"notes.txt"`.
#[must_use]
pub fn filename_from_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Builds a `data:` URI for binary content returned base64-encoded.
#[must_use]
pub fn data_uri(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}
