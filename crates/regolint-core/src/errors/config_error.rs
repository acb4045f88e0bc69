//! Configuration errors.

use super::error_code::{self, RegolintErrorCode};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not readable: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid glob pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl RegolintErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
