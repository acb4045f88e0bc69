//! Doc comments and `@key value` annotations.

use std::collections::BTreeMap;

use regolint_core::types::AnnotationValue;
use tree_sitter::Node;

use super::SourceContext;

/// Comment siblings directly above `siblings[index]`, with no blank line
/// between them and the declaration.
pub(crate) fn leading_comments<'t>(siblings: &[Node<'t>], index: usize) -> Vec<Node<'t>> {
    let Some(decl) = siblings.get(index) else {
        return Vec::new();
    };
    let mut next_row = decl.start_position().row;
    let mut first = index;

    while first > 0 {
        let prev = siblings[first - 1];
        if prev.kind() != "comment" || prev.end_position().row + 1 != next_row {
            break;
        }
        // A comment trailing code on the same line documents that code.
        if first >= 2 {
            let before = siblings[first - 2];
            if before.kind() != "comment" && before.end_position().row == prev.start_position().row {
                break;
            }
        }
        next_row = prev.start_position().row;
        first -= 1;
    }

    siblings[first..index].to_vec()
}

/// Comment text with delimiters stripped, one entry per comment, blanks dropped.
pub(crate) fn comment_lines(ctx: &SourceContext<'_>, comments: &[Node<'_>]) -> Vec<String> {
    comments
        .iter()
        .map(|c| strip_delimiters(ctx.text(*c)))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Doc text: stripped comment lines joined by newlines. Toolchain
/// directives such as `//go:build` are not part of the doc.
pub(crate) fn doc_text(ctx: &SourceContext<'_>, comments: &[Node<'_>]) -> String {
    let lines: Vec<String> = comments
        .iter()
        .map(|c| ctx.text(*c))
        .filter(|raw| !is_directive(raw))
        .map(strip_delimiters)
        .collect();
    lines.join("\n").trim().to_string()
}

pub(crate) fn strip_delimiters(raw: &str) -> String {
    let text = raw.strip_prefix("//").unwrap_or(raw);
    let text = text.strip_prefix("/*").unwrap_or(text);
    let text = text.strip_suffix("*/").unwrap_or(text);
    text.trim().to_string()
}

fn is_directive(raw: &str) -> bool {
    let Some(rest) = raw.strip_prefix("//") else {
        return false;
    };
    let Some((head, tail)) = rest.split_once(':') else {
        return false;
    };
    !head.is_empty()
        && head.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        && tail.bytes().next().is_some_and(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

/// `@key value` becomes a text annotation, a bare `@key` a `true` flag.
/// Later keys overwrite earlier ones.
pub(crate) fn annotations(lines: &[String]) -> BTreeMap<String, AnnotationValue> {
    let mut out = BTreeMap::new();
    for line in lines {
        let Some(rest) = line.strip_prefix('@') else {
            continue;
        };
        match rest.split_once(' ') {
            Some((key, value)) => {
                out.insert(key.to_string(), AnnotationValue::Text(value.trim().to_string()));
            }
            None => {
                out.insert(rest.to_string(), AnnotationValue::Flag(true));
            }
        }
    }
    out
}
