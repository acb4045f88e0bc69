//! Go source parse errors.

use std::path::PathBuf;

use super::error_code::{self, RegolintErrorCode};

/// Errors that can occur while parsing a Go source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to load Go grammar: {message}")]
    Grammar { message: String },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },

    #[error("Syntax error in {path} at {line}:{column} ({count} error nodes)")]
    Syntax {
        path: PathBuf,
        line: u32,
        column: u32,
        count: u32,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RegolintErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        error_code::PARSE_ERROR
    }
}
