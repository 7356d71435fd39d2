//! Character-offset helpers for widget text

/// 1-based cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Line, starting at 1
    pub line: usize,
    /// Column, starting at 1
    pub column: usize,
}

impl Cursor {
    /// Creates a cursor position.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Converts a character offset into a 1-based line and column.
///
/// Offsets past the end are clamped to the end of the text.
#[must_use]
pub fn cursor_at(text: &str, offset: usize) -> Cursor {
    let mut line = 1;
    let mut line_start = 0;
    let mut consumed = 0;
    for (index, ch) in text.chars().enumerate() {
        if index == offset {
            break;
        }
        consumed = index + 1;
        if ch == '\n' {
            line += 1;
            line_start = index + 1;
        }
    }
    Cursor::new(line, consumed - line_start + 1)
}

/// Number of lines, counting an empty text as one line.
#[must_use]
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Character offset where a 1-based line starts, clamped to valid lines.
#[must_use]
pub fn line_start(text: &str, line: usize) -> usize {
    let target = line.clamp(1, line_count(text));
    if target == 1 {
        return 0;
    }
    let mut seen = 1;
    for (index, ch) in text.chars().enumerate() {
        if ch == '\n' {
            seen += 1;
            if seen == target {
                return index + 1;
            }
        }
    }
    text.chars().count()
}

/// Extracts the characters in `from..to`.
#[must_use]
pub fn slice_chars(text: &str, from: usize, to: usize) -> String {
    text.chars().skip(from).take(to.saturating_sub(from)).collect()
}
