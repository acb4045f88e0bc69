//! Policy engine: compile once under restricted capabilities, evaluate many.

use std::collections::BTreeMap;

use regorus::{Engine, Value};
use regolint_core::constants::DENY_QUERY;
use regolint_core::errors::{CompileError, EvalError, PolicyDiagnostic};
use regolint_core::types::{FactBag, PackageFactBag, Violation};
use serde::Serialize;

use super::capabilities::Capabilities;
use super::decode::collect_violations;
use super::predicates::{Predicate, PREDICATES};
use super::regex_cache::RegexCache;

/// Compiled policy set with its prepared deny query.
///
/// Evaluation runs on a fresh clone of the compiled engine, so a runtime
/// failure for one fact bag never leaks state into the next.
pub struct PolicyEngine {
    engine: Engine,
    modules: Vec<String>,
    capabilities: Capabilities,
    regex_cache: RegexCache,
}

impl PolicyEngine {
    /// Compile `policies` (name → Rego text).
    ///
    /// All module diagnostics are collected before failing; no engine is
    /// returned when any module is rejected.
    pub fn build(policies: &BTreeMap<String, String>) -> Result<Self, CompileError> {
        Self::build_with(policies, Capabilities::restricted())
    }

    pub fn build_with(
        policies: &BTreeMap<String, String>,
        capabilities: Capabilities,
    ) -> Result<Self, CompileError> {
        let regex_cache = RegexCache::default();
        let mut engine = Engine::new();
        engine.set_strict_builtin_errors(capabilities.is_strict());

        for predicate in PREDICATES {
            register_predicate(&mut engine, predicate, &regex_cache).map_err(|e| {
                CompileError::Prepare {
                    query: predicate.name.to_string(),
                    message: format!("{e:#}"),
                }
            })?;
        }

        let mut diagnostics: Vec<PolicyDiagnostic> = Vec::new();
        for (name, text) in policies {
            diagnostics.extend(capabilities.check(name, text));
            if let Err(err) = engine.add_policy(name.clone(), text.clone()) {
                diagnostics.push(PolicyDiagnostic {
                    module: name.clone(),
                    message: format!("{err:#}"),
                });
            }
        }

        if !diagnostics.is_empty() {
            diagnostics.sort_by(|a, b| a.module.cmp(&b.module));
            return Err(CompileError::Diagnostics { diagnostics });
        }

        let compiled = Self {
            engine,
            modules: policies.keys().cloned().collect(),
            capabilities,
            regex_cache,
        };
        compiled.prepare();

        tracing::info!(modules = compiled.modules.len(), "policy engine ready");
        Ok(compiled)
    }

    /// Run the deny query once against an empty fact bag, with built-in
    /// errors non-strict. A failure is logged, not returned.
    fn prepare(&self) {
        let mut engine = self.engine.clone();
        engine.set_strict_builtin_errors(false);
        if let Err(err) = run_on(engine, &FactBag::default(), "<prepare>") {
            tracing::warn!(query = DENY_QUERY, error = %err, "deny query warm-up failed");
        }
    }

    /// Evaluate one file's facts.
    pub fn evaluate(&self, bag: &FactBag) -> Result<Vec<Violation>, EvalError> {
        let violations = run_on(self.engine.clone(), bag, &bag.file_path)?;
        tracing::debug!(file = %bag.file_path, violations = violations.len(), "evaluated");
        Ok(violations)
    }

    /// Evaluate an aggregated package with the same prepared query.
    pub fn evaluate_package(&self, package: &PackageFactBag) -> Result<Vec<Violation>, EvalError> {
        let target = format!("package {}", package.package.path);
        let violations = run_on(self.engine.clone(), package, &target)?;
        tracing::debug!(package = %package.package.path, violations = violations.len(), "evaluated");
        Ok(violations)
    }

    /// Names of the compiled modules, sorted.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn regex_cache(&self) -> &RegexCache {
        &self.regex_cache
    }
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("modules", &self.modules)
            .field("capabilities", &self.capabilities)
            .field("regex_cache", &self.regex_cache)
            .finish()
    }
}

/// Evaluate the deny query on `engine`, which is consumed so no input or
/// cached state outlives the call.
fn run_on<T: Serialize>(mut engine: Engine, input: &T, target: &str) -> Result<Vec<Violation>, EvalError> {
    let json = serde_json::to_string(input).map_err(|e| EvalError::Input {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    let input = Value::from_json_str(&json).map_err(|e| EvalError::Input {
        target: target.to_string(),
        message: format!("{e:#}"),
    })?;

    engine.set_input(input);
    let results = engine
        .eval_query(DENY_QUERY.to_string(), false)
        .map_err(|e| EvalError::Runtime {
            target: target.to_string(),
            message: format!("{e:#}"),
        })?;

    let mut violations = Vec::new();
    for result in &results.result {
        for expression in &result.expressions {
            let value = serde_json::to_value(&expression.value).map_err(|e| EvalError::Decode {
                target: target.to_string(),
                message: e.to_string(),
            })?;
            collect_violations(&value, &mut violations);
        }
    }
    Ok(violations)
}

fn register_predicate(
    engine: &mut Engine,
    predicate: Predicate,
    cache: &RegexCache,
) -> anyhow::Result<()> {
    let cache = cache.clone();
    let implementation = predicate.implementation;
    engine.add_extension(
        predicate.name.to_string(),
        predicate.arity,
        Box::new(move |args: Vec<Value>| -> anyhow::Result<Value> {
            Ok(implementation(&args, &cache))
        }),
    )
}
