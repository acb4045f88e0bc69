//! Configuration for regolint.
//! TOML-based: `REGOLINT_POLICY_DIR` env > `.regolint.toml` > defaults.

pub mod policies_config;
pub mod regolint_config;
pub mod rules_config;

pub use policies_config::{PoliciesConfig, RemotePolicy};
pub use regolint_config::{PerformanceConfig, RegolintConfig};
pub use rules_config::RulesConfig;
