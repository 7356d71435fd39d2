//! Property-based tests for the outline indexer

use std::collections::HashSet;

use proptest::prelude::*;

use codepad_core::outline::{OutlineNode, build_tree, collation_key, truncate_label, visible_rows};
use codepad_core::parse_symbols;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][a-zA-Z0-9_]{0,10}"
}

/// Source lines that each declare at most one symbol.
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        name_strategy().prop_map(|n| format!("function {n}() {{")),
        name_strategy().prop_map(|n| format!("class {n} {{")),
        name_strategy().prop_map(|n| format!("  {n}() {{")),
        name_strategy().prop_map(|n| format!("def {n}(self):")),
        name_strategy().prop_map(|n| format!("const {n} = () => 1;")),
        Just("}".to_string()),
        Just("// function hidden() {".to_string()),
        Just("let x = 1;".to_string()),
    ]
}

fn source_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(line_strategy(), 0..20).prop_map(|lines| lines.join("\n"))
}

fn node_count(nodes: &[OutlineNode]) -> usize {
    nodes.iter().map(|node| 1 + node_count(&node.children)).sum()
}

proptest! {
    /// Symbols come out sorted case-insensitively with no same-line duplicates.
    #[test]
    fn symbols_are_sorted_and_unique(source in source_strategy()) {
        let symbols = parse_symbols(&source);

        let keys: Vec<_> = symbols.iter().map(|s| collation_key(&s.name)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);

        let mut seen = HashSet::new();
        for symbol in &symbols {
            prop_assert!(seen.insert((symbol.line, symbol.name.clone())));
        }
    }

    /// Comment lines never produce symbols.
    #[test]
    fn commented_declarations_are_skipped(source in source_strategy()) {
        let comments: HashSet<usize> = source
            .split('\n')
            .enumerate()
            .filter(|(_, line)| line.starts_with("//"))
            .map(|(index, _)| index)
            .collect();
        prop_assert!(parse_symbols(&source).iter().all(|s| !comments.contains(&s.line)));
    }

    /// The tree holds every symbol exactly once, and a fully expanded tree
    /// shows one row per symbol.
    #[test]
    fn tree_keeps_every_symbol(source in source_strategy()) {
        let symbols = parse_symbols(&source);
        let count = symbols.len();
        let tree = build_tree(symbols);

        prop_assert_eq!(node_count(&tree), count);
        prop_assert_eq!(visible_rows(&tree, 50).len(), count);
    }

    /// Labels never exceed the limit plus the ellipsis.
    #[test]
    fn labels_are_bounded(text in "\\PC{0,80}", max_len in 1usize..60) {
        let label = truncate_label(&text, max_len);
        let chars = text.chars().count();
        if chars > max_len {
            prop_assert_eq!(label.chars().count(), max_len + 3);
            prop_assert!(label.ends_with("..."));
        } else {
            prop_assert_eq!(label, text);
        }
    }
}
