//! Per-rule customization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids whose violations are dropped.
    pub disabled: Vec<String>,
    /// Severity overrides keyed by rule id.
    pub severity: BTreeMap<String, String>,
}
