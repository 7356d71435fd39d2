//! Outline tree assembly and visible-row flattening

use super::parser::{Symbol, SymbolKind};

/// Suffix appended to truncated labels.
const ELLIPSIS: &str = "...";

/// One node of the outline tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// Symbol shown by this node
    pub symbol: Symbol,
    /// Nested symbols
    pub children: Vec<OutlineNode>,
    /// Collapsed nodes hide their children
    pub collapsed: bool,
}

impl OutlineNode {
    fn leaf(symbol: Symbol) -> Self {
        Self {
            symbol,
            children: Vec::new(),
            collapsed: false,
        }
    }

    /// Returns true if the node has nested symbols.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Symbol name cut to `max_len` characters, with an ellipsis if cut.
    #[must_use]
    pub fn label(&self, max_len: usize) -> String {
        truncate_label(&self.symbol.name, max_len)
    }
}

/// Cuts `text` to `max_len` characters and appends `"..."` if it was longer.
#[must_use]
pub fn truncate_label(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let mut label: String = text.chars().take(max_len).collect();
        label.push_str(ELLIPSIS);
        label
    } else {
        text.to_string()
    }
}

/// Assembles symbols into a forest, consuming them in the given order.
///
/// Each symbol goes under the most recent still-open node whose level is
/// strictly lower than its own. A node closes as soon as a symbol with the
/// same or a lower level arrives.
#[must_use]
pub fn build_tree(symbols: Vec<Symbol>) -> Vec<OutlineNode> {
    let mut children: Vec<Vec<usize>> = Vec::with_capacity(symbols.len());
    let mut roots = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for (index, symbol) in symbols.iter().enumerate() {
        while stack
            .last()
            .is_some_and(|&open| symbols[open].level >= symbol.level)
        {
            stack.pop();
        }
        match stack.last() {
            Some(&parent) => children[parent].push(index),
            None => roots.push(index),
        }
        children.push(Vec::new());
        stack.push(index);
    }

    // Children always come after their parent, so assembling back to front
    // finishes every subtree before its parent needs it.
    let mut nodes: Vec<Option<OutlineNode>> = Vec::with_capacity(symbols.len());
    nodes.resize_with(symbols.len(), || None);
    let mut symbols = symbols;
    while let Some(symbol) = symbols.pop() {
        let index = symbols.len();
        let mut node = OutlineNode::leaf(symbol);
        node.children = children[index]
            .iter()
            .filter_map(|&child| nodes[child].take())
            .collect();
        nodes[index] = Some(node);
    }

    roots
        .into_iter()
        .filter_map(|index| nodes[index].take())
        .collect()
}

/// A visible row of the rendered outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    /// Child indices from the root list down to this node
    pub path: Vec<usize>,
    /// Nesting depth, 0 for roots
    pub depth: usize,
    /// Truncated label
    pub label: String,
    /// Full symbol name, shown as a tooltip
    pub title: String,
    /// Symbol kind, used to pick the icon
    pub kind: SymbolKind,
    /// 0-based source line
    pub line: usize,
    /// Whether the row has a collapse toggle
    pub has_children: bool,
    /// Whether the row is collapsed
    pub collapsed: bool,
}

/// Flattens the forest into the rows currently visible.
///
/// Children of collapsed nodes are skipped.
#[must_use]
pub fn visible_rows(nodes: &[OutlineNode], max_label_len: usize) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    let mut path = Vec::new();
    push_rows(nodes, max_label_len, &mut path, &mut rows);
    rows
}

fn push_rows(
    nodes: &[OutlineNode],
    max_label_len: usize,
    path: &mut Vec<usize>,
    rows: &mut Vec<OutlineRow>,
) {
    for (index, node) in nodes.iter().enumerate() {
        path.push(index);
        rows.push(OutlineRow {
            path: path.clone(),
            depth: path.len() - 1,
            label: node.label(max_label_len),
            title: node.symbol.name.clone(),
            kind: node.symbol.kind,
            line: node.symbol.line,
            has_children: node.has_children(),
            collapsed: node.collapsed,
        });
        if !node.collapsed {
            push_rows(&node.children, max_label_len, path, rows);
        }
        path.pop();
    }
}

/// Node at a child-index path.
#[must_use]
pub fn node_at<'a>(nodes: &'a [OutlineNode], path: &[usize]) -> Option<&'a OutlineNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at(&node.children, rest)
    }
}

/// Mutable node at a child-index path.
pub fn node_at_mut<'a>(nodes: &'a mut [OutlineNode], path: &[usize]) -> Option<&'a mut OutlineNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.get_mut(*first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        node_at_mut(&mut node.children, rest)
    }
}

/// Calls `f` on every node that has children, depth first.
pub fn for_each_parent_mut(nodes: &mut [OutlineNode], f: &mut impl FnMut(&mut OutlineNode)) {
    for node in nodes {
        if node.has_children() {
            f(node);
        }
        for_each_parent_mut(&mut node.children, f);
    }
}

/// First node with children in depth-first order.
#[must_use]
pub fn first_parent(nodes: &[OutlineNode]) -> Option<&OutlineNode> {
    nodes.iter().find_map(|node| {
        if node.has_children() {
            Some(node)
        } else {
            first_parent(&node.children)
        }
    })
}
