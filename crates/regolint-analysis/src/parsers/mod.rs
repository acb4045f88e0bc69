//! Tree-sitter Go parsing.

pub mod error_tolerant;
pub mod go;
pub mod types;

pub use go::GoParser;
pub use types::ParsedFile;
