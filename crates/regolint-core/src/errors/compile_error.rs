//! Policy compilation errors.

use std::fmt;

use super::error_code::{self, RegolintErrorCode};

/// One diagnostic raised against one policy module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDiagnostic {
    /// Name the policy was registered under.
    pub module: String,
    pub message: String,
}

impl fmt::Display for PolicyDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.module, self.message)
    }
}

/// Fatal construction-time failure. Carries every module's diagnostics,
/// never just the first one.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{} policy diagnostic(s): {}", .diagnostics.len(), join(.diagnostics))]
    Diagnostics { diagnostics: Vec<PolicyDiagnostic> },

    #[error("Preparing query {query}: {message}")]
    Prepare { query: String, message: String },
}

impl CompileError {
    /// All module diagnostics (empty for query preparation failures).
    pub fn diagnostics(&self) -> &[PolicyDiagnostic] {
        match self {
            Self::Diagnostics { diagnostics } => diagnostics,
            Self::Prepare { .. } => &[],
        }
    }
}

impl RegolintErrorCode for CompileError {
    fn error_code(&self) -> &'static str {
        error_code::COMPILE_ERROR
    }
}

fn join(diagnostics: &[PolicyDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
