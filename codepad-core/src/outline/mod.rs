//! Outline Indexer
//!
//! Best-effort structural outline of the active document. No language
//! parser is involved: [`parse_symbols`] applies line-level regex rules,
//! [`build_tree`] nests the results by level and [`OutlinePanel`] binds the
//! tree to an editor.

mod navigator;
mod parser;
mod tree;

pub use navigator::{OutlinePanel, OutlineStatus};
pub use parser::{CLASS_LOOKBACK_LINES, Symbol, SymbolKind, collation_key, parse_symbols};
pub use tree::{OutlineNode, OutlineRow, build_tree, truncate_label, visible_rows};
