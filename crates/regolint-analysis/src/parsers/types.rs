//! Parsed-file handle shared by the transformer and directive extraction.

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Tree};

/// One parsed Go source file: the text, its syntax tree, and where it came from.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl ParsedFile {
    pub(crate) fn new(path: PathBuf, source: String, tree: Tree) -> Self {
        Self { path, source, tree }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Base name of the file path, used as `Position::file`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// 1-based (line, column) of a node's start.
pub fn start_point(node: Node<'_>) -> (u32, u32) {
    let p = node.start_position();
    (p.row as u32 + 1, p.column as u32 + 1)
}

/// 1-based line of a node's end.
pub fn end_line(node: Node<'_>) -> u32 {
    node.end_position().row as u32 + 1
}
