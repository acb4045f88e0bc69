//! Assembles the `name → text` policy set from disk and remote sources.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regolint_core::config::{PoliciesConfig, RegolintConfig};
use regolint_core::constants::{POLICY_EXTENSION, POLICY_TEST_SUFFIX};
use regolint_core::errors::LoadError;
use walkdir::WalkDir;

use crate::remote::{SecureFetcher, SecureFetcherConfig};

/// Loaded policy text plus non-fatal warnings (unverified remotes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedPolicies {
    pub policies: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

impl LoadedPolicies {
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct PolicyLoader {
    fetcher: SecureFetcher,
}

impl PolicyLoader {
    pub fn new(fetcher: SecureFetcher) -> Self {
        Self { fetcher }
    }

    /// Loader whose fetcher uses the configured timeout.
    pub fn from_config(config: &RegolintConfig) -> Self {
        Self::new(SecureFetcher::new(SecureFetcherConfig {
            timeout: Duration::from_secs(config.performance.fetch_timeout_secs),
            ..SecureFetcherConfig::default()
        }))
    }

    /// Load every configured source. Relative paths resolve against `root`.
    /// Local files come first; remote names replace local ones. Any failure
    /// aborts the whole load.
    pub fn load(&self, root: &Path, config: &PoliciesConfig) -> Result<LoadedPolicies, LoadError> {
        let mut loaded = LoadedPolicies::default();

        if !config.directory.is_empty() {
            let dir = resolve(root, &config.directory);
            loaded.policies.extend(load_directory(&dir)?);
        }

        for file in &config.files {
            let path = resolve(root, file);
            let (name, text) = load_file(&path)?;
            loaded.policies.insert(name, text);
        }

        for (name, fetched) in self.fetcher.fetch_all(&config.remote)? {
            loaded.warnings.extend(fetched.warnings);
            loaded.policies.insert(name, fetched.content);
        }

        tracing::info!(
            policies = loaded.policies.len(),
            warnings = loaded.warnings.len(),
            "loaded policies"
        );
        Ok(loaded)
    }
}

/// Every `*.rego` under `dir`, excluding `*_test.rego`, keyed by path.
/// A missing directory yields an empty set.
pub fn load_directory(dir: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    let mut policies = BTreeMap::new();
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "policy directory not found, skipping");
        return Ok(policies);
    }

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| LoadError::Directory {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !is_policy_file(entry.path()) {
            continue;
        }
        let text = read(entry.path())?;
        policies.insert(entry.path().display().to_string(), text);
    }
    Ok(policies)
}

/// One explicit policy file, keyed by its base name.
pub fn load_file(path: &Path) -> Result<(String, String), LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, read(path)?))
}

fn is_policy_file(path: &Path) -> bool {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let is_rego = path.extension().is_some_and(|ext| ext == POLICY_EXTENSION);
    is_rego && !name.ends_with(POLICY_TEST_SUFFIX)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
