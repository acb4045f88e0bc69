//! Directive parsing and extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use crate::parsers::types::{end_line, start_point};
use crate::parsers::ParsedFile;

static NOLINT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?://|/\*)\s*nolint\b(?::\s*([\w./-]+(?:\s*,\s*[\w./-]+)*))?(?:\s+//\s*(.+))?").ok()
});

/// A parsed `nolint` comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionDirective {
    pub line: u32,
    /// Last line of a struct body the directive covers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    /// Empty means every rule.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SuppressionDirective {
    pub fn matches(&self, rule: &str) -> bool {
        self.rules.is_empty() || self.rules.iter().any(|r| r == rule)
    }

    /// Whether `line` falls in the struct scope `(line, end_line]`.
    pub fn covers(&self, line: u32) -> bool {
        self.end_line
            .is_some_and(|end| line > self.line && line <= end)
    }
}

/// Parse one comment's text. `None` when it carries no directive.
pub fn parse_comment(text: &str, line: u32) -> Option<SuppressionDirective> {
    let caps = NOLINT.as_ref()?.captures(text)?;

    let rules = caps
        .get(1)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let reason = caps
        .get(2)
        .map(|m| m.as_str().trim().trim_end_matches("*/").trim().to_string())
        .filter(|r| !r.is_empty());

    Some(SuppressionDirective {
        line,
        end_line: None,
        rules,
        reason,
    })
}

/// Every directive in the file, in source order, with struct scopes applied.
pub fn extract_directives(parsed: &ParsedFile) -> Vec<SuppressionDirective> {
    let mut comments = Vec::new();
    let mut struct_scopes: HashMap<u32, u32> = HashMap::new();
    collect(parsed.root(), &mut comments, &mut struct_scopes);

    comments
        .into_iter()
        .filter_map(|node| {
            let (line, _) = start_point(node);
            let mut directive = parse_comment(parsed.text(node), line)?;
            directive.end_line = struct_scopes.get(&line).copied();
            Some(directive)
        })
        .collect()
}

/// Comments plus `line above struct spec → struct end line`.
fn collect<'t>(node: Node<'t>, comments: &mut Vec<Node<'t>>, scopes: &mut HashMap<u32, u32>) {
    match node.kind() {
        "comment" => comments.push(node),
        "type_spec" | "type_alias" => {
            let is_struct = node
                .child_by_field_name("type")
                .is_some_and(|t| t.kind() == "struct_type");
            if is_struct {
                let (start, _) = start_point(node);
                if start > 1 {
                    scopes.insert(start - 1, end_line(node));
                }
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, comments, scopes);
    }
}
