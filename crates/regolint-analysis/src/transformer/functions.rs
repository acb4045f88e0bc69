//! Function and method declarations.

use std::collections::HashMap;

use regolint_core::constants::GO_TEST_PREFIXES;
use regolint_core::types::{is_exported, FunctionInfo, ParameterInfo};
use tree_sitter::Node;

use super::docs::{annotations, comment_lines};
use super::format::format_type;
use super::{field_children, named_children, SourceContext};

/// A function's facts plus the identifiers its body can resolve to a type:
/// the receiver and every named parameter.
pub(crate) struct ExtractedFunction {
    pub info: FunctionInfo,
    pub scope: HashMap<String, String>,
}

pub(crate) fn extract(ctx: &SourceContext<'_>, node: Node<'_>, doc: &[Node<'_>]) -> ExtractedFunction {
    let name = ctx.field_text(node, "name").unwrap_or_default().to_string();
    let mut scope = HashMap::new();

    let receiver = node.child_by_field_name("receiver").and_then(|list| {
        let params = extract_params(ctx, list);
        let first = params.into_iter().next()?;
        if !first.name.is_empty() {
            scope.insert(first.name.clone(), first.type_name.clone());
        }
        Some(first.type_name)
    });

    let parameters = node
        .child_by_field_name("parameters")
        .map(|list| extract_params(ctx, list))
        .unwrap_or_default();
    for param in &parameters {
        if !param.name.is_empty() && param.name != "_" {
            scope.insert(param.name.clone(), param.type_name.clone());
        }
    }

    let returns = node
        .child_by_field_name("result")
        .map(|result| extract_results(ctx, result))
        .unwrap_or_default();

    let (complexity, line_count) = match node.child_by_field_name("body") {
        Some(body) => (
            complexity(body),
            (body.end_position().row - body.start_position().row + 1) as u32,
        ),
        None => (1, 0),
    };

    let comments = comment_lines(ctx, doc);
    let annotations = annotations(&comments);

    ExtractedFunction {
        info: FunctionInfo {
            is_exported: is_exported(&name),
            is_test: is_test_function(&name),
            receiver,
            parameters,
            returns,
            complexity,
            line_count,
            position: ctx.position(node),
            comments,
            annotations,
            name,
        },
        scope,
    }
}

/// Flatten a parameter list: one entry per declared name, or one nameless
/// entry for an unnamed group.
pub(crate) fn extract_params(ctx: &SourceContext<'_>, list: Node<'_>) -> Vec<ParameterInfo> {
    let mut params = Vec::new();
    for decl in named_children(list) {
        let type_name = match (decl.kind(), decl.child_by_field_name("type")) {
            ("parameter_declaration", Some(ty)) => format_type(ctx, ty),
            ("variadic_parameter_declaration", Some(ty)) => format!("...{}", format_type(ctx, ty)),
            _ => continue,
        };

        let names = field_children(decl, "name");
        if names.is_empty() {
            params.push(ParameterInfo {
                name: String::new(),
                type_name,
            });
            continue;
        }
        for name in names {
            params.push(ParameterInfo {
                name: ctx.text(name).to_string(),
                type_name: type_name.clone(),
            });
        }
    }
    params
}

/// A result is either a parenthesized list or one bare type.
pub(crate) fn extract_results(ctx: &SourceContext<'_>, result: Node<'_>) -> Vec<ParameterInfo> {
    if result.kind() == "parameter_list" {
        return extract_params(ctx, result);
    }
    vec![ParameterInfo {
        name: String::new(),
        type_name: format_type(ctx, result),
    }]
}

pub(crate) fn is_test_function(name: &str) -> bool {
    GO_TEST_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Cyclomatic complexity: 1 plus one per branch point anywhere in `body`,
/// nested function literals included.
pub(crate) fn complexity(body: Node<'_>) -> u32 {
    let mut total = 1;
    count_branches(body, &mut total);
    total
}

fn count_branches(node: Node<'_>, total: &mut u32) {
    match node.kind() {
        "if_statement"
        | "for_statement"
        | "expression_switch_statement"
        | "type_switch_statement"
        | "select_statement"
        | "expression_case"
        | "type_case"
        | "default_case"
        | "communication_case" => *total += 1,
        "binary_expression" => {
            if matches!(
                node.child_by_field_name("operator").map(|op| op.kind()),
                Some("&&" | "||")
            ) {
                *total += 1;
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        count_branches(child, total);
    }
}
