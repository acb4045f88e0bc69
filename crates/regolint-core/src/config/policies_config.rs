//! Where policies come from.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_POLICY_DIR;

/// Policy sources: a directory tree, explicit files, and remote URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoliciesConfig {
    /// Directory walked recursively for `*.rego` files. Empty disables it.
    pub directory: String,
    /// Individual policy files, keyed by base name once loaded.
    pub files: Vec<String>,
    /// Remote policies fetched over HTTPS.
    pub remote: Vec<RemotePolicy>,
}

impl Default for PoliciesConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_POLICY_DIR.to_string(),
            files: Vec::new(),
            remote: Vec::new(),
        }
    }
}

/// A policy to fetch from a URL, optionally pinned by SHA-256.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePolicy {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}
