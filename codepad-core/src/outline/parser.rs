//! Heuristic symbol scanner
//!
//! Each line is matched against an ordered list of regex rules covering
//! several languages at once. Rules never short-circuit each other, so one
//! line can yield more than one symbol; duplicates on the same line with
//! the same name are dropped afterwards. The result is sorted
//! alphabetically by name, not by position in the source.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::tracing::span_names;

/// Lines scanned upwards when deciding whether a method sits in a class
pub const CLASS_LOOKBACK_LINES: usize = 50;

/// Line prefixes that look like method calls but are control flow
const CONTROL_FLOW_PREFIXES: [&str; 6] = ["if", "for", "while", "elsif", "elif", "else"];

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#|//").expect("COMMENT_RE is a valid regex pattern")
});

static JS_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(export\s+)?(async\s+)?function\s+(\w+)")
        .expect("JS_FUNCTION_RE is a valid regex pattern")
});

static ARROW_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(const|let|var)\s+(\w+)\s*=\s*(async\s*)?(\([^)]*\)|[^=]+)\s*=>")
        .expect("ARROW_FUNCTION_RE is a valid regex pattern")
});

static FUNCTION_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(const|let|var)\s+(\w+)\s*=\s*(async\s*)?function")
        .expect("FUNCTION_ASSIGNMENT_RE is a valid regex pattern")
});

static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(async\s+)?(\w+)\s*\([^)]*\)\s*\{").expect("METHOD_RE is a valid regex pattern")
});

static ACCESSOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(get|set)\s+(\w+)\s*\([^)]*\)?\s*\{").expect("ACCESSOR_RE is a valid regex pattern")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(export\s+)?class\s+(\w+)").expect("CLASS_RE is a valid regex pattern")
});

static CLASS_CONTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^class\s+(\w+)").expect("CLASS_CONTEXT_RE is a valid regex pattern")
});

static SUB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(sub|procedure|proc)\s+(\w+)").expect("SUB_RE is a valid regex pattern")
});

static PYTHON_DEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^def\s+(\w+)").expect("PYTHON_DEF_RE is a valid regex pattern")
});

static GO_FUNC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^func\s+(\([^)]*\)\s+)?(\w+)\s*\([^)]*\)")
        .expect("GO_FUNC_RE is a valid regex pattern")
});

static PHP_FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(public|private|protected)?\s*(static)?\s*function\s+(\w+)")
        .expect("PHP_FUNCTION_RE is a valid regex pattern")
});

static TYPED_METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(public|private|protected|internal)\s+(static\s+)?(\w+\s+)?(\w+)\s*\([^)]*\)")
        .expect("TYPED_METHOD_RE is a valid regex pattern")
});

static CONSTRUCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(constructor|__construct)\s*\([^)]*\)")
        .expect("CONSTRUCTOR_RE is a valid regex pattern")
});

static DESTRUCTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(destructor|__destruct)\s*\([^)]*\)")
        .expect("DESTRUCTOR_RE is a valid regex pattern")
});

/// Kind of an outline symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Free function, including arrow and assigned functions
    Function,
    /// Method-call shaped declaration
    Method,
    /// Property getter
    Getter,
    /// Property setter
    Setter,
    /// Class declaration
    Class,
    /// Perl or VBA subroutine
    Sub,
    /// Pascal-style procedure
    Procedure,
    /// Constructor
    Constructor,
    /// Destructor
    Destructor,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Class => "class",
            Self::Sub => "sub",
            Self::Procedure => "procedure",
            Self::Constructor => "constructor",
            Self::Destructor => "destructor",
        };
        f.write_str(name)
    }
}

/// One symbol found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol kind
    pub kind: SymbolKind,
    /// Display name
    pub name: String,
    /// 0-based line number
    pub line: usize,
    /// Nesting level: 0 for classes, 2 for class members, 1 otherwise
    pub level: u8,
    /// Enclosing class for methods found inside one
    pub class_name: Option<String>,
}

impl Symbol {
    fn new(kind: SymbolKind, name: &str, line: usize, level: u8) -> Self {
        Self {
            kind,
            name: name.to_string(),
            line,
            level,
            class_name: None,
        }
    }
}

fn capture<'t>(re: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str())
}

/// Name of the nearest class declaration at or above `index`.
fn enclosing_class(lines: &[&str], index: usize) -> Option<String> {
    let start = index.saturating_sub(CLASS_LOOKBACK_LINES + 1);
    lines[start..=index]
        .iter()
        .rev()
        .find_map(|line| capture(&CLASS_CONTEXT_RE, line.trim(), 1).map(str::to_string))
}

fn scan_line(lines: &[&str], index: usize, out: &mut Vec<Symbol>) {
    let trimmed = lines[index].trim();
    if COMMENT_RE.is_match(trimmed) {
        return;
    }

    if let Some(name) = capture(&JS_FUNCTION_RE, trimmed, 3) {
        out.push(Symbol::new(SymbolKind::Function, name, index, 1));
    }

    if let Some(name) = capture(&ARROW_FUNCTION_RE, trimmed, 2)
        .or_else(|| capture(&FUNCTION_ASSIGNMENT_RE, trimmed, 2))
    {
        out.push(Symbol::new(SymbolKind::Function, name, index, 1));
    }

    if let Some(name) = capture(&METHOD_RE, trimmed, 2) {
        let control_flow = CONTROL_FLOW_PREFIXES
            .iter()
            .any(|prefix| trimmed.starts_with(prefix));
        if !control_flow {
            let class_name = enclosing_class(lines, index);
            let level = if class_name.is_some() { 2 } else { 1 };
            let mut symbol = Symbol::new(SymbolKind::Method, name, index, level);
            symbol.class_name = class_name;
            out.push(symbol);
        }
    }

    if let Some(caps) = ACCESSOR_RE.captures(trimmed) {
        let kind = if &caps[1] == "get" {
            SymbolKind::Getter
        } else {
            SymbolKind::Setter
        };
        out.push(Symbol::new(kind, &caps[2], index, 2));
    }

    if let Some(name) = capture(&CLASS_RE, trimmed, 2) {
        out.push(Symbol::new(SymbolKind::Class, name, index, 0));
    }

    if let Some(caps) = SUB_RE.captures(trimmed) {
        let kind = if caps[1].eq_ignore_ascii_case("sub") {
            SymbolKind::Sub
        } else {
            SymbolKind::Procedure
        };
        out.push(Symbol::new(kind, &caps[2], index, 1));
    }

    if let Some(name) = capture(&PYTHON_DEF_RE, trimmed, 1) {
        out.push(Symbol::new(SymbolKind::Function, name, index, 1));
    }

    if let Some(name) = capture(&GO_FUNC_RE, trimmed, 2) {
        out.push(Symbol::new(SymbolKind::Function, name, index, 1));
    }

    if !trimmed.contains('=') {
        if let Some(name) = capture(&PHP_FUNCTION_RE, trimmed, 3) {
            out.push(Symbol::new(SymbolKind::Function, name, index, 1));
        }
    }

    if trimmed.contains('{') {
        if let Some(name) = capture(&TYPED_METHOD_RE, trimmed, 4) {
            if !name.contains("class") && !name.contains("interface") {
                out.push(Symbol::new(SymbolKind::Method, name, index, 1));
            }
        }
    }

    if let Some(name) = capture(&CONSTRUCTOR_RE, trimmed, 1) {
        out.push(Symbol::new(SymbolKind::Constructor, name, index, 1));
    }

    if let Some(name) = capture(&DESTRUCTOR_RE, trimmed, 1) {
        out.push(Symbol::new(SymbolKind::Destructor, name, index, 1));
    }
}

/// Sort key ordering names the way a default locale collation does:
/// case-insensitive, punctuation before digits, digits before letters.
#[must_use]
pub fn collation_key(name: &str) -> Vec<(u8, char)> {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            let class = if c.is_alphabetic() {
                2
            } else if c.is_numeric() {
                1
            } else {
                0
            };
            (class, c)
        })
        .collect()
}

/// Scans text for symbols, dropping same-line duplicates and sorting by
/// [`collation_key`].
#[must_use]
pub fn parse_symbols(text: &str) -> Vec<Symbol> {
    let _span = tracing::debug_span!(span_names::OUTLINE_PARSE).entered();
    let lines: Vec<&str> = text.split('\n').collect();

    let mut found = Vec::new();
    for index in 0..lines.len() {
        scan_line(&lines, index, &mut found);
    }

    let mut seen = HashSet::new();
    let mut symbols: Vec<Symbol> = found
        .into_iter()
        .filter(|symbol| seen.insert((symbol.line, symbol.name.clone())))
        .collect();
    symbols.sort_by_cached_key(|symbol| collation_key(&symbol.name));

    tracing::debug!(count = symbols.len(), "Outline parsed");
    symbols
}
