//! Go parser backed by tree-sitter-go.

use std::path::{Path, PathBuf};

use regolint_core::errors::ParseError;
use tree_sitter::Parser;

use super::error_tolerant::count_errors;
use super::types::ParsedFile;

/// Strict Go parser: source with syntax errors is rejected rather than
/// partially transformed.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ParseError::Grammar {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse `source`, attributing it to `path`.
    pub fn parse(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Result<ParsedFile, ParseError> {
        let path = path.into();
        let source = source.into();

        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| ParseError::NoTree { path: path.clone() })?;

        if let Some(errors) = count_errors(tree.root_node()) {
            return Err(ParseError::Syntax {
                path,
                line: errors.first_line,
                column: errors.first_column,
                count: errors.count,
            });
        }

        Ok(ParsedFile::new(path, source, tree))
    }

    /// Read and parse a file from disk.
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile, ParseError> {
        let source = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(path, source)
    }
}
