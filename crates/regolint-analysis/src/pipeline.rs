//! Lint orchestration: parse → transform → evaluate → filter.
//!
//! The policy engine is built lazily on first use and its outcome is kept
//! in [`EngineState`], so a failed build is reported on every later call
//! without being retried.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use globset::GlobSet;
use regolint_core::config::RegolintConfig;
use regolint_core::errors::{LintError, RegolintErrorCode};
use regolint_core::types::{FactBag, PackageFactBag, Violation};

use crate::loader::PolicyLoader;
use crate::parsers::{GoParser, ParsedFile};
use crate::policy::PolicyEngine;
use crate::suppression::{extract_directives, filter_violations, SuppressionDirective};
use crate::transformer::Transformer;

/// Engine lifecycle. `Ready(None)` means the policy set was empty.
#[derive(Debug, Default)]
pub enum EngineState {
    #[default]
    Uninitialized,
    Building,
    Ready(Option<PolicyEngine>),
    Failed(String),
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[derive(Debug)]
enum PolicySource {
    /// Load through [`PolicyLoader`] relative to this root.
    Project(PathBuf),
    Inline(BTreeMap<String, String>),
}

pub struct Linter {
    config: RegolintConfig,
    include: GlobSet,
    exclude: GlobSet,
    source: PolicySource,
    state: EngineState,
    parser: GoParser,
    module_path: String,
    warnings: Vec<String>,
}

impl Linter {
    /// Linter loading policies as configured, relative to the working
    /// directory.
    pub fn new(config: RegolintConfig) -> Result<Self, LintError> {
        Self::with_root(config, ".")
    }

    pub fn with_root(config: RegolintConfig, root: impl Into<PathBuf>) -> Result<Self, LintError> {
        Self::from_source(config, PolicySource::Project(root.into()))
    }

    /// Linter over an in-memory policy set; configured policy sources are
    /// ignored.
    pub fn with_policies(config: RegolintConfig, policies: BTreeMap<String, String>) -> Result<Self, LintError> {
        Self::from_source(config, PolicySource::Inline(policies))
    }

    /// Include and exclude globs are compiled here; an invalid pattern is a
    /// configuration error.
    fn from_source(config: RegolintConfig, source: PolicySource) -> Result<Self, LintError> {
        let include = config.include_set()?;
        let exclude = config.exclude_set()?;
        Ok(Self {
            config,
            include,
            exclude,
            source,
            state: EngineState::Uninitialized,
            parser: GoParser::new()?,
            module_path: String::new(),
            warnings: Vec::new(),
        })
    }

    /// Module path recorded in fact bags and used to derive package paths.
    pub fn with_module_path(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    pub fn config(&self) -> &RegolintConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Non-fatal conditions seen while building the engine.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// True if `path` is included and not excluded by configuration.
    pub fn should_lint(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }

    /// Lint one Go source file.
    pub fn lint_source(&mut self, path: &str, source: &str) -> Result<Vec<Violation>, LintError> {
        self.ensure_engine()?;
        let parsed = self.parser.parse(path, source)?;
        let Some(engine) = self.ready_engine() else {
            return Ok(Vec::new());
        };

        let bag = self.transformer_for(path).transform(&parsed, path);
        let raw = engine.evaluate(&bag)?;

        let violations = raw
            .into_iter()
            .filter_map(|v| self.apply_rules(v, path))
            .collect();
        Ok(filter_violations(violations, &extract_directives(&parsed)))
    }

    /// Lint the files of one package together. `files` are `(path, source)`
    /// pairs; each violation is filtered against the directives of the file
    /// its position names.
    pub fn lint_package(&mut self, files: &[(String, String)]) -> Result<Vec<Violation>, LintError> {
        self.ensure_engine()?;
        let mut parsed: Vec<ParsedFile> = Vec::with_capacity(files.len());
        for (path, source) in files {
            parsed.push(self.parser.parse(path.as_str(), source.as_str())?);
        }
        let Some(engine) = self.ready_engine() else {
            return Ok(Vec::new());
        };
        let Some((first_path, _)) = files.first() else {
            return Ok(Vec::new());
        };

        let transformer = self.transformer_for(first_path);
        let bags: Vec<FactBag> = parsed
            .iter()
            .zip(files)
            .map(|(p, (path, _))| transformer.transform(p, path))
            .collect();
        let Some(package) = PackageFactBag::aggregate(&bags) else {
            return Ok(Vec::new());
        };
        let raw = engine.evaluate_package(&package)?;

        let mut directives: HashMap<String, (&str, Vec<SuppressionDirective>)> = HashMap::new();
        for (p, (path, _)) in parsed.iter().zip(files) {
            directives
                .entry(p.file_name())
                .or_insert_with(|| (path.as_str(), extract_directives(p)));
        }

        let mut violations = Vec::new();
        for violation in raw {
            match directives.get(&violation.position.file) {
                Some((path, file_directives)) => {
                    if let Some(v) = self.apply_rules(violation, path) {
                        violations.extend(filter_violations(vec![v], file_directives));
                    }
                }
                None => {
                    let file = violation.position.file.clone();
                    violations.extend(self.apply_rules(violation, &file));
                }
            }
        }
        Ok(violations)
    }

    /// Drive the state machine to a terminal state. The first failure is
    /// returned as-is; later calls report it as `EngineUnavailable`.
    fn ensure_engine(&mut self) -> Result<(), LintError> {
        if matches!(self.state, EngineState::Uninitialized) {
            self.state = EngineState::Building;
            match self.build_engine() {
                Ok(engine) => self.state = EngineState::Ready(engine),
                Err(err) => {
                    tracing::error!(error = %err, "policy engine build failed");
                    self.state = EngineState::Failed(err.coded_string());
                    return Err(err);
                }
            }
        }

        match &self.state {
            EngineState::Ready(_) => Ok(()),
            EngineState::Failed(reason) => Err(LintError::EngineUnavailable {
                reason: reason.clone(),
            }),
            EngineState::Uninitialized | EngineState::Building => Err(LintError::EngineUnavailable {
                reason: "policy engine is still being built".to_string(),
            }),
        }
    }

    fn build_engine(&mut self) -> Result<Option<PolicyEngine>, LintError> {
        let policies = match &self.source {
            PolicySource::Project(root) => {
                let loaded = PolicyLoader::from_config(&self.config).load(root, &self.config.policies)?;
                self.warnings.extend(loaded.warnings);
                loaded.policies
            }
            PolicySource::Inline(policies) => policies.clone(),
        };

        if policies.is_empty() {
            tracing::warn!("no policies loaded, linting will report nothing");
            self.warnings.push("no policies loaded".to_string());
            return Ok(None);
        }
        Ok(Some(PolicyEngine::build(&policies)?))
    }

    fn ready_engine(&self) -> Option<&PolicyEngine> {
        match &self.state {
            EngineState::Ready(engine) => engine.as_ref(),
            _ => None,
        }
    }

    fn transformer_for(&self, path: &str) -> Transformer {
        Transformer::new(self.module_path.clone(), package_path(&self.module_path, path))
    }

    /// Disabled rules are dropped. A configured severity replaces the
    /// policy's own, which otherwise defaults to `error`.
    fn apply_rules(&self, mut violation: Violation, path: &str) -> Option<Violation> {
        if self.config.is_rule_disabled(&violation.rule) {
            return None;
        }
        let severity = self
            .config
            .severity_for(&violation.rule, violation.effective_severity())
            .to_string();
        violation.severity = Some(severity);
        violation.position.file = path.to_string();
        Some(violation)
    }
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter")
            .field("source", &self.source)
            .field("state", &self.state)
            .field("module_path", &self.module_path)
            .finish()
    }
}

/// Import path of the package containing `file`: the module path joined
/// with the file's directory.
pub fn package_path(module_path: &str, file: &str) -> String {
    let dir = Path::new(file)
        .parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();
    let dir = dir.trim_start_matches("./").trim_matches('/');

    match (module_path.is_empty(), dir.is_empty() || dir == ".") {
        (_, true) => module_path.to_string(),
        (true, false) => dir.to_string(),
        (false, false) => format!("{module_path}/{dir}"),
    }
}
