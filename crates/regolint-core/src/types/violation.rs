//! Violations returned by policies, with optional auto-fix suggestions.

use serde::{Deserialize, Serialize};

use super::facts::Position;
use crate::constants::DEFAULT_SEVERITY;

/// A single policy violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub message: String,
    pub rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Violation {
    /// Severity to render: the policy's own, or `error` when it set none.
    pub fn effective_severity(&self) -> &str {
        self.severity.as_deref().unwrap_or(DEFAULT_SEVERITY)
    }
}

/// An auto-fix suggestion for a violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<FixEdit>,
}

/// A single text edit of a fix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixEdit {
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_text: Option<String>,
    pub new_text: String,
}
