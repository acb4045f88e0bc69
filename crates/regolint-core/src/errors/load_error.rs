//! Policy loading errors.

use std::path::PathBuf;

use super::error_code::{self, RegolintErrorCode};
use super::FetchError;

/// Errors raised while assembling the policy set. Any of these aborts
/// startup; a partially loaded policy set is never used.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Reading policy directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Reading policy {path}: {source}")]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Remote policy: {0}")]
    Remote(#[from] FetchError),
}

impl RegolintErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Remote(e) => e.error_code(),
            _ => error_code::LOAD_ERROR,
        }
    }
}
