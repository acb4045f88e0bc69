//! Restricted capability set for untrusted policy text.
//!
//! The network, runtime and deprecated built-ins are compiled out of the
//! evaluator. On top of that each module's code (comments and string
//! literals blanked) is scanned so that any reference to a denied built-in,
//! and any deprecated call in strict mode, becomes a diagnostic.

use std::sync::LazyLock;

use regex::Regex;
use regolint_core::errors::PolicyDiagnostic;

/// Built-ins that reach the network or the host runtime.
pub const DENIED_BUILTINS: [&str; 3] = ["http.send", "net.lookup_ip_addr", "opa.runtime"];

/// Built-ins rejected in strict mode.
pub const DEPRECATED_BUILTINS: [&str; 11] = [
    "any",
    "all",
    "re_match",
    "set_diff",
    "net.cidr_overlap",
    "cast_array",
    "cast_set",
    "cast_string",
    "cast_boolean",
    "cast_null",
    "cast_object",
];

static DENIED_REFERENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&reference_pattern(&DENIED_BUILTINS)).ok());

static DEPRECATED_CALL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(&call_pattern(&DEPRECATED_BUILTINS)).ok());

fn alternatives(names: &[&str]) -> String {
    names.iter().map(|n| regex::escape(n)).collect::<Vec<_>>().join("|")
}

/// A whole name not preceded by an identifier character or `.`.
fn reference_pattern(names: &[&str]) -> String {
    format!(r"(?m)(?:^|[^\w.])({})\b", alternatives(names))
}

/// As [`reference_pattern`], followed by `(`.
fn call_pattern(names: &[&str]) -> String {
    format!(r"(?m)(?:^|[^\w.])({})\s*\(", alternatives(names))
}

/// What compiled policies may do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    denied: Vec<&'static str>,
    allow_net: Vec<String>,
    strict: bool,
}

impl Capabilities {
    /// Every built-in except the denylist, no network hosts, strict mode on.
    pub fn restricted() -> Self {
        Self {
            denied: DENIED_BUILTINS.to_vec(),
            allow_net: Vec::new(),
            strict: true,
        }
    }

    pub fn is_denied(&self, builtin: &str) -> bool {
        self.denied.contains(&builtin)
    }

    /// Hosts policies may contact. Always empty.
    pub fn allow_net(&self) -> &[String] {
        &self.allow_net
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Diagnostics for every reference to a denied built-in (calls,
    /// `with` targets, bare names) and every deprecated call in `text`.
    pub fn check(&self, module: &str, text: &str) -> Vec<PolicyDiagnostic> {
        let code = blank_comments_and_strings(text);
        let mut diagnostics = Vec::new();

        if let Some(re) = DENIED_REFERENCE.as_ref() {
            for (name, line) in find_names(re, &code) {
                if self.is_denied(name) {
                    diagnostics.push(PolicyDiagnostic {
                        module: module.to_string(),
                        message: format!("line {line}: built-in `{name}` is not allowed"),
                    });
                }
            }
        }

        if self.strict {
            if let Some(re) = DEPRECATED_CALL.as_ref() {
                for (name, line) in find_names(re, &code) {
                    diagnostics.push(PolicyDiagnostic {
                        module: module.to_string(),
                        message: format!("line {line}: deprecated built-in `{name}` rejected in strict mode"),
                    });
                }
            }
        }

        diagnostics
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::restricted()
    }
}

/// (builtin name, 1-based line) per match. A name continuing with `.`
/// (`http.send.x`) is a different reference and is skipped.
fn find_names<'t>(re: &Regex, code: &'t str) -> Vec<(&'t str, usize)> {
    re.captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !code[m.end()..].starts_with('.'))
        .map(|m| {
            let line = code[..m.start()].bytes().filter(|&b| b == b'\n').count() + 1;
            (m.as_str(), line)
        })
        .collect()
}

/// Replace `#` comments and string literal contents with spaces, keeping
/// newlines so line numbers survive.
fn blank_comments_and_strings(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Comment,
        Quoted,
        QuotedEscape,
        Raw,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    for ch in text.chars() {
        let (next, keep) = match (state, ch) {
            (_, '\n') if state != State::Raw => (
                match state {
                    State::Comment => State::Code,
                    other => other,
                },
                true,
            ),
            (State::Code, '#') => (State::Comment, false),
            (State::Code, '"') => (State::Quoted, true),
            (State::Code, '`') => (State::Raw, true),
            (State::Code, _) => (State::Code, true),
            (State::Comment, _) => (State::Comment, false),
            (State::Quoted, '\\') => (State::QuotedEscape, false),
            (State::Quoted, '"') => (State::Code, true),
            (State::Quoted, _) => (State::Quoted, false),
            (State::QuotedEscape, _) => (State::Quoted, false),
            (State::Raw, '`') => (State::Code, true),
            (State::Raw, '\n') => (State::Raw, true),
            (State::Raw, _) => (State::Raw, false),
        };
        out.push(if keep { ch } else { ' ' });
        state = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_set_denies_network_builtins() {
        let caps = Capabilities::restricted();
        assert!(caps.is_denied("http.send"));
        assert!(caps.is_denied("net.lookup_ip_addr"));
        assert!(caps.is_denied("opa.runtime"));
        assert!(!caps.is_denied("count"));
        assert!(caps.allow_net().is_empty());
        assert!(caps.is_strict());
    }

    #[test]
    fn flags_denied_call_with_line() {
        let text = "package x\n\nimport rego.v1\n\nr := http.send({\"url\": \"https://x\"})\n";
        let diags = Capabilities::restricted().check("x.rego", text);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].module, "x.rego");
        assert!(diags[0].message.contains("line 5"));
        assert!(diags[0].message.contains("http.send"));
    }

    #[test]
    fn ignores_comments_strings_and_lookalikes() {
        let text = r#"package x

import rego.v1

# http.send(...) is not allowed here
msg := "call http.send( later"
ok if { input.company(1) }
ok if { count(input.imports) > 0 }
ok if { my.any(1) }
"#;
        assert!(Capabilities::restricted().check("x.rego", text).is_empty());
    }

    #[test]
    fn flags_denied_references_that_are_not_calls() {
        let text = "package x\n\nimport rego.v1\n\nrt := time.now_ns() with time.now_ns as opa.runtime\nf := http.send\n";
        let diags = Capabilities::restricted().check("x.rego", text);
        assert_eq!(diags.len(), 2, "{diags:?}");
        assert!(diags[0].message.contains("line 5") && diags[0].message.contains("opa.runtime"));
        assert!(diags[1].message.contains("line 6") && diags[1].message.contains("http.send"));
    }

    #[test]
    fn data_paths_and_longer_names_are_not_references() {
        let text = "package x\n\nimport rego.v1\n\na := input.http.send\nb := http.sender\nc := opa.runtime.version\n";
        assert!(Capabilities::restricted().check("x.rego", text).is_empty());
    }

    #[test]
    fn flags_deprecated_builtins_in_strict_mode() {
        let text = "package x\n\nimport rego.v1\n\nr if { re_match(\"a\", \"a\") }\nq if { any([true]) }\n";
        let diags = Capabilities::restricted().check("x.rego", text);
        assert_eq!(diags.len(), 2);
        assert!(diags[0].message.contains("re_match"));
        assert!(diags[1].message.contains("any"));
    }
}
