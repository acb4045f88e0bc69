//! Full pipeline: Go source → facts → Rego → suppression.

use std::collections::BTreeMap;

use regolint_analysis::parsers::GoParser;
use regolint_analysis::suppression::{extract_directives, filter_violations};
use regolint_analysis::transformer::Transformer;
use regolint_analysis::{EngineState, Linter, PolicyEngine};
use regolint_core::config::RegolintConfig;

const BANNED_IMPORTS: &str = r#"package regolint.rules.security.banned_imports

import rego.v1

banned := {"unsafe"}

deny contains violation if {
	some imp in input.imports
	imp.path in banned
	violation := {
		"message": sprintf("import of %s is not allowed", [imp.path]),
		"rule": "SEC001",
		"position": imp.position,
	}
}
"#;

const BAD_FUNCTIONS: &str = r#"package regolint.rules.style.bad_functions

import rego.v1

deny contains violation if {
	some fn in input.all_functions
	fn.name == "Bad"
	violation := {
		"message": "functions must not be named Bad",
		"rule": "PKG001",
		"severity": "warning",
		"position": fn.position,
	}
}
"#;

fn policy_set(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect()
}

const MAIN_GO: &str = "package main\n\nimport \"unsafe\"\n\nvar _ = unsafe.Sizeof(0)\n";
const MAIN_GO_SUPPRESSED: &str = "package main\n\nimport \"unsafe\" // nolint:SEC001 // needed for FFI\n\nvar _ = unsafe.Sizeof(0)\n";

#[test]
fn banned_import_is_reported_once_with_position() {
    let engine = PolicyEngine::build(&policy_set(&[("banned.rego", BANNED_IMPORTS)])).unwrap();
    let parsed = GoParser::new().unwrap().parse("cmd/main.go", MAIN_GO).unwrap();
    let bag = Transformer::new("example.com/app", "example.com/app/cmd").transform(&parsed, "cmd/main.go");

    let violations = engine.evaluate(&bag).unwrap();
    assert_eq!(violations.len(), 1, "{violations:?}");
    let v = &violations[0];
    assert_eq!(v.rule, "SEC001");
    assert_eq!(v.message, "import of unsafe is not allowed");
    assert_eq!(v.position.file, "main.go");
    assert_eq!((v.position.line, v.position.column), (3, 8));
    assert_eq!(v.effective_severity(), "error");

    let filtered = filter_violations(violations, &extract_directives(&parsed));
    assert_eq!(filtered.len(), 1);
}

#[test]
fn nolint_on_the_violating_line_removes_it() {
    let engine = PolicyEngine::build(&policy_set(&[("banned.rego", BANNED_IMPORTS)])).unwrap();
    let parsed = GoParser::new().unwrap().parse("main.go", MAIN_GO_SUPPRESSED).unwrap();
    let bag = Transformer::new("example.com/app", "example.com/app").transform(&parsed, "main.go");

    let violations = engine.evaluate(&bag).unwrap();
    assert_eq!(violations.len(), 1);

    let filtered = filter_violations(violations, &extract_directives(&parsed));
    assert!(filtered.is_empty(), "{filtered:?}");
}

#[test]
fn linter_applies_config_and_suppression() {
    let policies = policy_set(&[("banned.rego", BANNED_IMPORTS)]);

    let mut linter = Linter::with_policies(RegolintConfig::default(), policies.clone())
        .unwrap()
        .with_module_path("example.com/app");
    let violations = linter.lint_source("cmd/main.go", MAIN_GO).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].position.file, "cmd/main.go");
    assert!(linter.state().is_ready());

    assert!(linter.lint_source("cmd/main.go", MAIN_GO_SUPPRESSED).unwrap().is_empty());

    let mut config = RegolintConfig::default();
    config.rules.severity.insert("SEC001".to_string(), "warning".to_string());
    let mut linter = Linter::with_policies(config, policies.clone()).unwrap();
    let violations = linter.lint_source("main.go", MAIN_GO).unwrap();
    assert_eq!(violations[0].severity.as_deref(), Some("warning"));

    let mut config = RegolintConfig::default();
    config.rules.disabled.push("SEC001".to_string());
    let mut linter = Linter::with_policies(config, policies).unwrap();
    assert!(linter.lint_source("main.go", MAIN_GO).unwrap().is_empty());
}

#[test]
fn package_lint_filters_against_the_owning_file() {
    let files = vec![
        ("pkg/a.go".to_string(), "package pkg\n\nfunc Bad() {}\n".to_string()),
        (
            "pkg/b.go".to_string(),
            "package pkg\n\n// nolint:PKG001\nfunc Bad() {}\n".to_string(),
        ),
    ];
    let mut linter = Linter::with_policies(
        RegolintConfig::default(),
        policy_set(&[("bad.rego", BAD_FUNCTIONS)]),
    )
    .unwrap()
    .with_module_path("example.com/app");

    let violations = linter.lint_package(&files).unwrap();
    assert_eq!(violations.len(), 1, "{violations:?}");
    assert_eq!(violations[0].rule, "PKG001");
    assert_eq!(violations[0].position.file, "pkg/a.go");
    assert_eq!(violations[0].position.line, 3);
    assert_eq!(violations[0].severity.as_deref(), Some("warning"));
}

#[test]
fn project_policies_load_from_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let policy_dir = dir.path().join(".regolint/policies");
    std::fs::create_dir_all(&policy_dir).unwrap();
    std::fs::write(policy_dir.join("banned.rego"), BANNED_IMPORTS).unwrap();
    std::fs::write(policy_dir.join("banned_test.rego"), "this is skipped {{{").unwrap();

    let mut linter = Linter::with_root(RegolintConfig::default(), dir.path()).unwrap();
    assert!(matches!(linter.state(), EngineState::Uninitialized));

    let violations = linter.lint_source("main.go", MAIN_GO).unwrap();
    assert_eq!(violations.len(), 1);
    assert!(linter.warnings().is_empty());
}
