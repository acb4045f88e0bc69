//! Secondary walk over a function body: calls, type usages, field accesses.

use std::collections::HashMap;

use regolint_core::types::{CallInfo, FactBag, FieldAccessInfo, TypeUsageContext, TypeUsageInfo};
use tree_sitter::Node;

use super::format::format_expr;
use super::{first_named, named_children, SourceContext};

const ANONYMOUS_CALLEE: &str = "(anonymous)";
const CONVERSION_CALLEE: &str = "(conversion)";
const CALL_RESULT_RECEIVER: &str = "call";

struct BodyWalker<'c, 'a> {
    ctx: &'c SourceContext<'a>,
    in_function: &'c str,
    scope: &'c HashMap<String, String>,
    bag: &'c mut FactBag,
}

/// Walk `body` in pre-order, appending to the bag's calls, type usages and
/// field accesses.
pub(crate) fn walk(
    ctx: &SourceContext<'_>,
    body: Node<'_>,
    in_function: &str,
    scope: &HashMap<String, String>,
    bag: &mut FactBag,
) {
    let mut walker = BodyWalker {
        ctx,
        in_function,
        scope,
        bag,
    };
    walker.visit(body);
}

impl BodyWalker<'_, '_> {
    fn visit(&mut self, node: Node<'_>) {
        match node.kind() {
            "call_expression" => self.record_call(node),
            "type_conversion_expression" => self.record_conversion(node),
            "selector_expression" if !is_callee(node) => self.record_field_access(node),
            "composite_literal" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.record_type_usage(ty, node, TypeUsageContext::CompositeLiteral);
                }
            }
            "type_assertion_expression" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    self.record_type_usage(ty, node, TypeUsageContext::TypeAssertion);
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    fn record_call(&mut self, node: Node<'_>) {
        let mut call = CallInfo {
            args: self.arguments(node),
            in_function: self.in_function.to_string(),
            position: self.ctx.position(node),
            ..Default::default()
        };

        if let Some(callee) = node.child_by_field_name("function") {
            match callee.kind() {
                "identifier" => call.function = self.ctx.text(callee).to_string(),
                "selector_expression" => {
                    call.function = self.ctx.field_text(callee, "field").unwrap_or_default().to_string();
                    if let Some(operand) = callee.child_by_field_name("operand") {
                        match operand.kind() {
                            "identifier" => {
                                let name = self.ctx.text(operand).to_string();
                                call.receiver_type = self.scope.get(&name).cloned();
                                call.package = Some(name.clone());
                                call.receiver = Some(name);
                            }
                            "call_expression" => call.receiver = Some(CALL_RESULT_RECEIVER.to_string()),
                            "selector_expression" => call.receiver = Some(self.selector_chain(operand)),
                            _ => {}
                        }
                    }
                }
                "func_literal" => call.function = ANONYMOUS_CALLEE.to_string(),
                "parenthesized_expression" => {
                    call.function = CONVERSION_CALLEE.to_string();
                    if let Some(inner) = first_named(callee) {
                        self.record_type_usage(inner, node, TypeUsageContext::Conversion);
                    }
                }
                _ => {}
            }
        }

        self.bag.calls.push(call);
    }

    /// `[]byte(s)` and friends parse as conversions rather than calls.
    fn record_conversion(&mut self, node: Node<'_>) {
        let args = node
            .child_by_field_name("operand")
            .map(|operand| vec![format_expr(self.ctx, operand)])
            .unwrap_or_default();
        self.bag.calls.push(CallInfo {
            function: CONVERSION_CALLEE.to_string(),
            args,
            in_function: self.in_function.to_string(),
            position: self.ctx.position(node),
            ..Default::default()
        });
        if let Some(ty) = node.child_by_field_name("type") {
            self.record_type_usage(ty, node, TypeUsageContext::Conversion);
        }
    }

    fn record_field_access(&mut self, node: Node<'_>) {
        let Some(field) = self.ctx.field_text(node, "field") else {
            return;
        };
        let Some(operand) = node.child_by_field_name("operand") else {
            return;
        };
        let type_name = match operand.kind() {
            "identifier" => self.scope.get(self.ctx.text(operand)).cloned(),
            _ => None,
        };
        self.bag.field_accesses.push(FieldAccessInfo {
            field: field.to_string(),
            receiver: format_expr(self.ctx, operand),
            type_name,
            in_function: self.in_function.to_string(),
            position: self.ctx.position(node),
        });
    }

    /// Records named types only; literal shapes such as `[]int{}` are skipped.
    fn record_type_usage(&mut self, ty: Node<'_>, at: Node<'_>, context: TypeUsageContext) {
        let Some((type_name, package)) = self.named_type(ty) else {
            return;
        };
        self.bag.type_usages.push(TypeUsageInfo {
            type_name,
            package,
            in_function: self.in_function.to_string(),
            context,
            position: self.ctx.position(at),
        });
    }

    fn named_type(&self, node: Node<'_>) -> Option<(String, Option<String>)> {
        match node.kind() {
            "type_identifier" | "identifier" => Some((self.ctx.text(node).to_string(), None)),
            "qualified_type" => Some((
                self.ctx.field_text(node, "name")?.to_string(),
                Some(self.ctx.field_text(node, "package")?.to_string()),
            )),
            "selector_expression" => {
                let operand = node.child_by_field_name("operand")?;
                if operand.kind() != "identifier" {
                    return None;
                }
                Some((
                    self.ctx.field_text(node, "field")?.to_string(),
                    Some(self.ctx.text(operand).to_string()),
                ))
            }
            "generic_type" => self.named_type(node.child_by_field_name("type")?),
            "unary_expression" => {
                let op = node.child_by_field_name("operator")?;
                if op.kind() != "*" {
                    return None;
                }
                self.named_type(node.child_by_field_name("operand")?)
            }
            "pointer_type" | "parenthesized_type" | "parenthesized_expression" => {
                self.named_type(first_named(node)?)
            }
            _ => None,
        }
    }

    fn arguments(&self, call: Node<'_>) -> Vec<String> {
        call.child_by_field_name("arguments")
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .map(|arg| format_expr(self.ctx, arg))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `a.b.c` as written; non-selector operands render as `unknown`.
    fn selector_chain(&self, node: Node<'_>) -> String {
        match node.kind() {
            "identifier" => self.ctx.text(node).to_string(),
            "selector_expression" => {
                let operand = node
                    .child_by_field_name("operand")
                    .map(|o| self.selector_chain(o))
                    .unwrap_or_else(|| "unknown".to_string());
                let field = self.ctx.field_text(node, "field").unwrap_or_default();
                format!("{operand}.{field}")
            }
            _ => "unknown".to_string(),
        }
    }
}

fn is_callee(node: Node<'_>) -> bool {
    node.parent()
        .filter(|parent| parent.kind() == "call_expression")
        .and_then(|parent| parent.child_by_field_name("function"))
        .is_some_and(|callee| callee == node)
}
