//! Shared constants for the regolint engine.

/// regolint version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension every policy file carries.
pub const POLICY_EXTENSION: &str = "rego";

/// Suffix of policy unit-test files, skipped when loading a directory.
pub const POLICY_TEST_SUFFIX: &str = "_test.rego";

/// Suffix of Go test files.
pub const GO_TEST_FILE_SUFFIX: &str = "_test.go";

/// Name prefixes that mark a Go test entry point.
pub const GO_TEST_PREFIXES: &[&str] = &["Test", "Benchmark", "Example", "Fuzz"];

/// Query enumerating every `deny` rule across every category and rule name.
pub const DENY_QUERY: &str = "data.regolint.rules[category][rule].deny";

/// Maximum number of compiled patterns kept by the regex cache.
pub const MAX_REGEX_CACHE_SIZE: u64 = 1000;

/// Maximum size of a remote policy payload (10 MiB).
pub const MAX_POLICY_SIZE: u64 = 10 * 1024 * 1024;

/// Default timeout for a remote policy fetch.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default policy directory, relative to the project root.
pub const DEFAULT_POLICY_DIR: &str = ".regolint/policies";

/// Project config file name.
pub const CONFIG_FILE_NAME: &str = ".regolint.toml";

/// Severity applied at render time when a violation carries none.
pub const DEFAULT_SEVERITY: &str = "error";
