//! Custom Go-aware predicates exposed to policies.
//!
//! A fixed table of (name, arity, implementation, memoize) entries. Each
//! implementation is a pure function of its arguments plus the engine's
//! regex cache.

use regorus::Value;
use regolint_core::constants::GO_TEST_FILE_SUFFIX;
use regolint_core::types::is_exported;

use super::regex_cache::RegexCache;

/// Signature shared by every predicate implementation.
pub type PredicateFn = fn(&[Value], &RegexCache) -> Value;

#[derive(Clone, Copy)]
pub struct Predicate {
    pub name: &'static str,
    pub arity: u8,
    pub implementation: PredicateFn,
    /// Same arguments always give the same result.
    pub memoize: bool,
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("memoize", &self.memoize)
            .finish()
    }
}

pub const PREDICATES: [Predicate; 4] = [
    Predicate {
        name: "go.matches_pattern",
        arity: 2,
        implementation: matches_pattern,
        memoize: true,
    },
    Predicate {
        name: "go.is_exported",
        arity: 1,
        implementation: go_is_exported,
        memoize: true,
    },
    Predicate {
        name: "go.is_test_file",
        arity: 1,
        implementation: is_test_file,
        memoize: true,
    },
    Predicate {
        name: "go.package_name",
        arity: 1,
        implementation: package_name,
        memoize: true,
    },
];

fn string_arg(args: &[Value], index: usize) -> Option<&str> {
    match args.get(index) {
        Some(Value::String(s)) => Some(s.as_ref()),
        _ => None,
    }
}

/// `go.matches_pattern(text, pattern)`. Undefined for non-string arguments.
fn matches_pattern(args: &[Value], cache: &RegexCache) -> Value {
    match (string_arg(args, 0), string_arg(args, 1)) {
        (Some(text), Some(pattern)) => Value::Bool(cache.is_match(text, pattern)),
        _ => Value::Undefined,
    }
}

/// `go.is_exported(name)`. False for non-strings.
fn go_is_exported(args: &[Value], _: &RegexCache) -> Value {
    Value::Bool(string_arg(args, 0).is_some_and(is_exported))
}

/// `go.is_test_file(name)`. False for non-strings.
fn is_test_file(args: &[Value], _: &RegexCache) -> Value {
    Value::Bool(string_arg(args, 0).is_some_and(is_go_test_file))
}

/// `go.package_name(path)`: the segment after the last `/`.
fn package_name(args: &[Value], _: &RegexCache) -> Value {
    match string_arg(args, 0) {
        Some(path) => Value::from(last_path_segment(path).to_string()),
        None => Value::Undefined,
    }
}

/// A name strictly longer than the `_test.go` suffix that ends with it.
pub fn is_go_test_file(name: &str) -> bool {
    name.len() > GO_TEST_FILE_SUFFIX.len() && name.ends_with(GO_TEST_FILE_SUFFIX)
}

pub fn last_path_segment(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, last)| last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: Vec<Value>) -> Value {
        let cache = RegexCache::new(16);
        let predicate = PREDICATES.iter().find(|p| p.name == name).unwrap();
        assert_eq!(predicate.arity as usize, args.len());
        (predicate.implementation)(&args, &cache)
    }

    fn s(text: &str) -> Value {
        Value::from(text.to_string())
    }

    #[test]
    fn table_is_fixed() {
        let names: Vec<&str> = PREDICATES.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["go.matches_pattern", "go.is_exported", "go.is_test_file", "go.package_name"]
        );
        assert!(PREDICATES.iter().all(|p| p.memoize));
    }

    #[test]
    fn is_test_file_requires_suffix_and_stem() {
        assert!(is_go_test_file("x_test.go"));
        assert!(is_go_test_file("handler_test.go"));
        assert!(!is_go_test_file("_test.go"));
        assert!(!is_go_test_file("handler.go"));
        assert!(!is_go_test_file("test.go"));
        assert_eq!(call("go.is_test_file", vec![Value::Null]), Value::Bool(false));
    }

    #[test]
    fn is_exported_predicate() {
        assert_eq!(call("go.is_exported", vec![s("Foo")]), Value::Bool(true));
        assert_eq!(call("go.is_exported", vec![s("foo")]), Value::Bool(false));
        assert_eq!(call("go.is_exported", vec![s("")]), Value::Bool(false));
    }

    #[test]
    fn package_name_predicate() {
        assert_eq!(call("go.package_name", vec![s("net/http")]), s("http"));
        assert_eq!(call("go.package_name", vec![s("fmt")]), s("fmt"));
        assert_eq!(call("go.package_name", vec![s("example.com/x/")]), s(""));
        assert_eq!(call("go.package_name", vec![Value::Null]), Value::Undefined);
    }

    #[test]
    fn matches_pattern_predicate() {
        assert_eq!(call("go.matches_pattern", vec![s("GetUser"), s("^Get")]), Value::Bool(true));
        assert_eq!(call("go.matches_pattern", vec![s("x"), s("(")]), Value::Bool(false));
        assert_eq!(call("go.matches_pattern", vec![Value::Null, s("x")]), Value::Undefined);
    }
}
