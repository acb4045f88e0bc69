//! Syntax error detection on tree-sitter trees.

use tree_sitter::Node;

/// First error location (1-based line, column) and the total error-node count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxErrors {
    pub count: u32,
    pub first_line: u32,
    pub first_column: u32,
}

/// Count ERROR and MISSING nodes in a tree.
pub fn count_errors(root: Node<'_>) -> Option<SyntaxErrors> {
    if !root.has_error() {
        return None;
    }
    let mut count = 0u32;
    let mut first: Option<(u32, u32)> = None;
    collect_errors(root, &mut count, &mut first);
    first.map(|(first_line, first_column)| SyntaxErrors {
        count,
        first_line,
        first_column,
    })
}

fn collect_errors(node: Node<'_>, count: &mut u32, first: &mut Option<(u32, u32)>) {
    if node.is_error() || node.is_missing() {
        *count += 1;
        if first.is_none() {
            let p = node.start_position();
            *first = Some((p.row as u32 + 1, p.column as u32 + 1));
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            collect_errors(child, count, first);
        }
    }
}
