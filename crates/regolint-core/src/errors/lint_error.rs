//! Top-level lint errors.

use super::error_code::{self, RegolintErrorCode};
use super::{CompileError, ConfigError, EvalError, LoadError, ParseError};

/// Errors surfaced by the lint pipeline. Aggregates subsystem errors via
/// `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("Loading policies: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Policy engine unavailable: {reason}")]
    EngineUnavailable { reason: String },
}

impl RegolintErrorCode for LintError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(e) => e.error_code(),
            Self::Compile(e) => e.error_code(),
            Self::Eval(e) => e.error_code(),
            Self::Load(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::EngineUnavailable { .. } => error_code::ENGINE_UNAVAILABLE,
        }
    }
}
