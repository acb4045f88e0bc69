//! Top-level regolint configuration.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use super::{PoliciesConfig, RulesConfig};
use crate::constants::{CONFIG_FILE_NAME, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::errors::ConfigError;

/// Environment variable overriding `policies.directory`.
pub const POLICY_DIR_ENV_VAR: &str = "REGOLINT_POLICY_DIR";

const VALID_SEVERITIES: [&str; 3] = ["error", "warning", "info"];

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. `REGOLINT_POLICY_DIR`
/// 2. Project config (`.regolint.toml` in the project root)
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegolintConfig {
    pub policies: PoliciesConfig,
    pub rules: RulesConfig,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub performance: PerformanceConfig,
}

impl Default for RegolintConfig {
    fn default() -> Self {
        Self {
            policies: PoliciesConfig::default(),
            rules: RulesConfig::default(),
            include: vec!["**/*.go".to_string()],
            exclude: vec![
                "**/*_test.go".to_string(),
                "**/vendor/**".to_string(),
                "**/testdata/**".to_string(),
            ],
            performance: PerformanceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Per-request timeout for remote policy fetches.
    pub fetch_timeout_secs: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl RegolintConfig {
    /// Load configuration for a project rooted at `root`.
    ///
    /// A missing `.regolint.toml` yields the defaults.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Self::default()
        };

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Read and parse one TOML file without env overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &RegolintConfig) -> Result<(), ConfigError> {
        for (rule, severity) in &config.rules.severity {
            if !VALID_SEVERITIES.contains(&severity.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("rules.severity.{rule}"),
                    message: format!(
                        "must be one of {}, got {severity:?}",
                        VALID_SEVERITIES.join(", ")
                    ),
                });
            }
        }
        if config.performance.fetch_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "performance.fetch_timeout_secs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for remote in &config.policies.remote {
            if remote.url.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "policies.remote.url".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    fn apply_env_overrides(config: &mut RegolintConfig) {
        if let Ok(dir) = std::env::var(POLICY_DIR_ENV_VAR) {
            if !dir.is_empty() {
                config.policies.directory = dir;
            }
        }
    }

    /// True if `rule_id` is listed under `rules.disabled`.
    pub fn is_rule_disabled(&self, rule_id: &str) -> bool {
        self.rules.disabled.iter().any(|r| r == rule_id)
    }

    /// Configured severity for `rule_id`, or `default` when none is set.
    pub fn severity_for<'a>(&'a self, rule_id: &str, default: &'a str) -> &'a str {
        self.rules
            .severity
            .get(rule_id)
            .map(String::as_str)
            .unwrap_or(default)
    }

    /// Compile the exclude patterns into a matcher.
    pub fn exclude_set(&self) -> Result<GlobSet, ConfigError> {
        build_glob_set(&self.exclude)
    }

    /// Compile the include patterns into a matcher.
    pub fn include_set(&self) -> Result<GlobSet, ConfigError> {
        build_glob_set(&self.include)
    }

    /// True if `file_path` matches any exclude pattern.
    /// Invalid patterns never match.
    pub fn should_skip(&self, file_path: &str) -> bool {
        self.exclude.iter().any(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(file_path))
                .unwrap_or(false)
        })
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(","),
        message: e.to_string(),
    })
}
