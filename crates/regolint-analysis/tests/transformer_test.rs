//! Fact extraction over a realistic file.

use regolint_analysis::parsers::GoParser;
use regolint_analysis::transformer::Transformer;
use regolint_core::types::{FactBag, PackageFactBag, TypeKind};

const SERVICE_GO: &str = r#"// Package service handles users.
package service

import (
	"context"
	"fmt"
	db "example.com/app/internal/storage"
)

const MaxUsers = 100

var defaultTimeout = 30

// User is a stored account.
type User struct {
	ID   int    `json:"id"`
	Name string `json:"name"`
	db.Model
}

type Store interface {
	Get(ctx context.Context, id int) (*User, error)
}

// Lookup finds a user.
// @deprecated use Find
func (s *Service) Lookup(ctx context.Context, id int) (*User, error) {
	if id <= 0 || id > MaxUsers {
		return nil, fmt.Errorf("bad id %d", id)
	}
	for i := 0; i < 3; i++ {
		switch i {
		case 0:
		case 1:
		}
	}
	return s.store.Get(ctx, id)
}

func helper() {}
"#;

fn transform(path: &str, source: &str) -> FactBag {
    let parsed = GoParser::new().unwrap().parse(path, source).unwrap();
    Transformer::new("example.com/app", "example.com/app/service").transform(&parsed, path)
}

#[test]
fn output_is_deterministic() {
    let first = serde_json::to_string(&transform("service/user.go", SERVICE_GO)).unwrap();
    let second = serde_json::to_string(&transform("service/user.go", SERVICE_GO)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn extracts_top_level_facts() {
    let bag = transform("service/user.go", SERVICE_GO);

    assert_eq!(bag.package.name, "service");
    assert_eq!(bag.package.doc, "Package service handles users.");

    let imports: Vec<&str> = bag.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(imports, vec!["context", "fmt", "example.com/app/internal/storage"]);
    assert_eq!(bag.imports[2].alias.as_deref(), Some("db"));

    assert_eq!(bag.constants.len(), 1);
    assert_eq!(bag.constants[0].name, "MaxUsers");
    assert!(bag.constants[0].is_const && bag.constants[0].is_exported);
    assert_eq!(bag.variables.len(), 1);
    assert!(!bag.variables[0].is_exported);

    let user = &bag.types[0];
    assert_eq!(user.name, "User");
    assert_eq!(user.kind, TypeKind::Struct);
    assert_eq!(user.doc, "User is a stored account.");
    let fields: Vec<(&str, &str)> = user.fields.iter().map(|f| (f.name.as_str(), f.tags.as_str())).collect();
    assert_eq!(fields[0], ("ID", r#"json:"id""#));
    assert!(user.embeds.iter().any(|e| e == "db.Model"));

    let store = &bag.types[1];
    assert_eq!(store.kind, TypeKind::Interface);
    assert_eq!(store.methods.len(), 1);
    assert_eq!(store.methods[0].name, "Get");
}

#[test]
fn function_metrics() {
    let bag = transform("service/user.go", SERVICE_GO);
    let lookup = bag.functions.iter().find(|f| f.name == "Lookup").unwrap();

    assert_eq!(lookup.receiver.as_deref(), Some("*Service"));
    assert!(lookup.is_exported);
    assert!(!lookup.is_test);
    // if, ||, for, switch, two cases
    assert_eq!(lookup.complexity, 7);
    assert_eq!(lookup.parameters.len(), 2);
    assert_eq!(lookup.returns.len(), 2);
    assert_eq!(lookup.comments.first().map(String::as_str), Some("Lookup finds a user."));
    assert!(lookup.annotations.contains_key("deprecated"));

    let helper = bag.functions.iter().find(|f| f.name == "helper").unwrap();
    assert_eq!(helper.complexity, 1);
    assert!(!helper.is_exported);

    let calls: Vec<&str> = bag.calls.iter().map(|c| c.function.as_str()).collect();
    assert!(calls.contains(&"Errorf"));
    assert!(calls.contains(&"Get"));
    assert!(bag.calls.iter().all(|c| c.in_function == "Lookup"));
}

#[test]
fn test_functions_are_flagged() {
    let bag = transform(
        "service/user_test.go",
        "package service\n\nfunc TestLookup(t *testing.T) {}\n\nfunc BenchmarkLookup(b *testing.B) {}\n\nfunc lookupHelper() {}\n",
    );
    let flags: Vec<(&str, bool)> = bag.functions.iter().map(|f| (f.name.as_str(), f.is_test)).collect();
    assert_eq!(
        flags,
        vec![("TestLookup", true), ("BenchmarkLookup", true), ("lookupHelper", false)]
    );
}

#[test]
fn package_aggregation_deduplicates_imports() {
    let a = transform("service/a.go", "package service\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n");
    let b = transform("service/b.go", "package service\n\nimport (\n\t\"os\"\n\t\"strings\"\n)\n\nfunc B() {}\n");

    let package = PackageFactBag::aggregate(&[a, b]).unwrap();
    let paths: Vec<&str> = package.all_imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["fmt", "os", "strings"]);
    assert_eq!(package.all_imports[1].position.file, "a.go");
    assert_eq!(package.files.len(), 2);
    assert_eq!(package.all_functions.len(), 1);
}
