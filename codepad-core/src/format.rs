//! Document formatting
//!
//! Formatting is best effort: structured data is pretty-printed, a few
//! brace-delimited languages get their indentation normalized, and
//! everything else is reported as [`FormatOutcome::NotFormatted`] so the
//! caller leaves the document untouched.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::model::Language;

/// Indentation unit used by both formatters.
pub const INDENT: &str = "    ";

/// Result of a format request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The text was rewritten
    Formatted,
    /// The formatter ran but the text was already formatted
    Unchanged,
    /// Unsupported language or invalid input; nothing was changed
    NotFormatted,
}

impl FormatOutcome {
    /// Returns true unless formatting was refused.
    #[must_use]
    pub const fn succeeded(self) -> bool {
        !matches!(self, Self::NotFormatted)
    }
}

/// Formats `code` for the given language.
///
/// Returns `None` when the language is unsupported or the input cannot
/// be parsed.
#[must_use]
pub fn format_code(code: &str, language: Language) -> Option<String> {
    match language {
        Language::Json => format_json(code),
        lang if lang.is_brace_delimited() => Some(normalize_indentation(code)),
        _ => None,
    }
}

/// Pretty-prints JSON with four-space indentation, keeping key order.
#[must_use]
pub fn format_json(code: &str) -> Option<String> {
    let value: serde_json::Value = match serde_json::from_str(code) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(%e, "JSON formatting skipped, input does not parse");
            return None;
        }
    };
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT.as_bytes()));
    value.serialize(&mut serializer).ok()?;
    String::from_utf8(out).ok()
}

/// Re-indents brace-delimited code by nesting depth.
///
/// Each non-blank line is trimmed and indented by the depth reached so far.
/// A line that starts with a closing bracket is dedented first. Brackets
/// inside string literals are ignored. Blank lines become empty.
#[must_use]
pub fn normalize_indentation(code: &str) -> String {
    let mut level: i64 = 0;
    let mut out = Vec::new();

    for line in code.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        let starts_with_close = trimmed.starts_with(['}', ']', ')']);
        if starts_with_close && level > 0 {
            level -= 1;
        }

        let depth = usize::try_from(level).unwrap_or(0);
        out.push(format!("{}{trimmed}", INDENT.repeat(depth)));

        let (opens, closes) = count_brackets(trimmed);
        level += opens - closes;
        if starts_with_close {
            level += 1;
        }
        level = level.max(0);
    }

    out.join("\n")
}

/// Counts open and close brackets outside string literals.
fn count_brackets(line: &str) -> (i64, i64) {
    let mut opens = 0;
    let mut closes = 0;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for ch in line.chars() {
        match quote {
            None if matches!(ch, '"' | '\'' | '`') => quote = Some(ch),
            Some(q) if ch == q && prev != Some('\\') => quote = None,
            None => match ch {
                '{' | '[' | '(' => opens += 1,
                '}' | ']' | ')' => closes += 1,
                _ => {}
            },
            Some(_) => {}
        }
        prev = Some(ch);
    }

    (opens, closes)
}
