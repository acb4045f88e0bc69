//! Textual rendering of type and expression nodes.
//!
//! Types render structurally (`map[string]*pkg.T`). Expressions render
//! shallowly: call arguments, composite bodies and indices are elided.

use tree_sitter::Node;

use super::{first_named, named_children, SourceContext};

const UNKNOWN_TYPE: &str = "unknown";
const UNKNOWN_EXPR: &str = "expr";

enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Render a type node as Go-like text.
pub(crate) fn format_type(ctx: &SourceContext<'_>, node: Node<'_>) -> String {
    match node.kind() {
        "type_identifier" | "identifier" | "field_identifier" | "package_identifier" => {
            ctx.text(node).to_string()
        }
        "pointer_type" => match first_named(node) {
            Some(inner) => format!("*{}", format_type(ctx, inner)),
            None => UNKNOWN_TYPE.to_string(),
        },
        "qualified_type" => format!(
            "{}.{}",
            ctx.field_text(node, "package").unwrap_or(UNKNOWN_TYPE),
            ctx.field_text(node, "name").unwrap_or(UNKNOWN_TYPE),
        ),
        "slice_type" => format!("[]{}", field_type(ctx, node, "element")),
        "array_type" | "implicit_length_array_type" => {
            format!("[...]{}", field_type(ctx, node, "element"))
        }
        "map_type" => format!(
            "map[{}]{}",
            field_type(ctx, node, "key"),
            field_type(ctx, node, "value")
        ),
        "channel_type" => {
            let value = field_type(ctx, node, "value");
            match channel_direction(node) {
                ChanDir::Send => format!("chan<- {value}"),
                ChanDir::Recv => format!("<-chan {value}"),
                ChanDir::Both => format!("chan {value}"),
            }
        }
        "function_type" => "func(...)".to_string(),
        "interface_type" => "interface{}".to_string(),
        "struct_type" => "struct{}".to_string(),
        "generic_type" => {
            let base = field_type(ctx, node, "type");
            let args: Vec<String> = node
                .child_by_field_name("type_arguments")
                .map(|list| named_children(list).into_iter().map(|a| format_type(ctx, a)).collect())
                .unwrap_or_default();
            format!("{base}[{}]", args.join(", "))
        }
        "parenthesized_type" => match first_named(node) {
            Some(inner) => format_type(ctx, inner),
            None => UNKNOWN_TYPE.to_string(),
        },
        "negated_type" => match first_named(node) {
            Some(inner) => format!("~{}", format_type(ctx, inner)),
            None => UNKNOWN_TYPE.to_string(),
        },
        // Union and constraint elements: `int | ~string`.
        "type_elem" | "constraint_elem" | "interface_type_name" => {
            let parts: Vec<String> = named_children(node)
                .into_iter()
                .map(|t| format_type(ctx, t))
                .collect();
            if parts.is_empty() {
                UNKNOWN_TYPE.to_string()
            } else {
                parts.join(" | ")
            }
        }
        _ => UNKNOWN_TYPE.to_string(),
    }
}

fn field_type(ctx: &SourceContext<'_>, node: Node<'_>, field: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| format_type(ctx, n))
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
}

fn channel_direction(node: Node<'_>) -> ChanDir {
    let mut cursor = node.walk();
    let tokens: Vec<&str> = node
        .children(&mut cursor)
        .filter(|c| !c.is_named())
        .map(|c| c.kind())
        .collect();
    match tokens.as_slice() {
        ["<-", "chan", ..] => ChanDir::Recv,
        ["chan", "<-", ..] => ChanDir::Send,
        _ => ChanDir::Both,
    }
}

/// Render an expression node. Shapes without a rendering become `expr`.
pub(crate) fn format_expr(ctx: &SourceContext<'_>, node: Node<'_>) -> String {
    match node.kind() {
        "identifier" | "field_identifier" | "type_identifier" | "int_literal" | "float_literal"
        | "imaginary_literal" | "rune_literal" | "interpreted_string_literal"
        | "raw_string_literal" | "true" | "false" | "nil" | "iota" => ctx.text(node).to_string(),
        "selector_expression" => format!(
            "{}.{}",
            field_expr(ctx, node, "operand"),
            ctx.field_text(node, "field").unwrap_or(UNKNOWN_EXPR),
        ),
        "call_expression" => format!("{}(...)", field_expr(ctx, node, "function")),
        "unary_expression" => format!(
            "{}{}",
            node.child_by_field_name("operator").map(|op| op.kind()).unwrap_or(""),
            field_expr(ctx, node, "operand"),
        ),
        "binary_expression" => format!(
            "{} {} {}",
            field_expr(ctx, node, "left"),
            node.child_by_field_name("operator").map(|op| op.kind()).unwrap_or(""),
            field_expr(ctx, node, "right"),
        ),
        "composite_literal" => {
            let ty = node
                .child_by_field_name("type")
                .map(|t| format_type(ctx, t))
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
            format!("{ty}{{...}}")
        }
        "func_literal" => "func(){...}".to_string(),
        "index_expression" => format!("{}[...]", field_expr(ctx, node, "operand")),
        "slice_expression" => format!("{}[:]", field_expr(ctx, node, "operand")),
        "type_assertion_expression" => format!("{}.(type)", field_expr(ctx, node, "operand")),
        "type_conversion_expression" => {
            let ty = node
                .child_by_field_name("type")
                .map(|t| format_type(ctx, t))
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
            format!("{ty}(...)")
        }
        // `xs...` in an argument list renders as `xs`.
        "variadic_argument" => match first_named(node) {
            Some(inner) => format_expr(ctx, inner),
            None => UNKNOWN_EXPR.to_string(),
        },
        _ => UNKNOWN_EXPR.to_string(),
    }
}

fn field_expr(ctx: &SourceContext<'_>, node: Node<'_>, field: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| format_expr(ctx, n))
        .unwrap_or_else(|| UNKNOWN_EXPR.to_string())
}
