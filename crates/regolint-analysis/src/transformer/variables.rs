//! `var` and `const` declarations.

use regolint_core::types::{is_exported, VariableInfo};
use tree_sitter::Node;

use super::format::{format_expr, format_type};
use super::{field_children, named_children, SourceContext};

/// One entry per declared name. Names share the spec's type; a value is
/// recorded only when an initializer sits at the same index.
pub(crate) fn extract(ctx: &SourceContext<'_>, decl: Node<'_>, is_const: bool, out: &mut Vec<VariableInfo>) {
    let mut specs = Vec::new();
    collect_specs(decl, &mut specs);

    for spec in specs {
        let type_name = spec.child_by_field_name("type").map(|t| format_type(ctx, t));
        let values = spec
            .child_by_field_name("value")
            .map(named_children)
            .unwrap_or_default();

        for (index, name) in field_children(spec, "name").into_iter().enumerate() {
            let name_text = ctx.text(name);
            out.push(VariableInfo {
                name: name_text.to_string(),
                type_name: type_name.clone(),
                is_exported: is_exported(name_text),
                is_const,
                value: values.get(index).map(|v| format_expr(ctx, *v)),
                position: ctx.position(name),
            });
        }
    }
}

fn collect_specs<'t>(node: Node<'t>, specs: &mut Vec<Node<'t>>) {
    for child in named_children(node) {
        match child.kind() {
            "var_spec" | "const_spec" => specs.push(child),
            "var_spec_list" | "const_spec_list" => collect_specs(child, specs),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parsers::GoParser;
    use crate::transformer::Transformer;

    #[test]
    fn variables_and_constants() {
        let src = "package p

var a, b int = 1, 2
var Timeout = time.Second

const (
	KindA Kind = iota
	KindB
)
";
        let parsed = GoParser::new().unwrap().parse("v.go", src).unwrap();
        let bag = Transformer::new("m", "m/p").transform(&parsed, "v.go");

        assert_eq!(bag.variables.len(), 3);
        assert_eq!(bag.variables[0].name, "a");
        assert_eq!(bag.variables[0].type_name.as_deref(), Some("int"));
        assert_eq!(bag.variables[0].value.as_deref(), Some("1"));
        assert_eq!(bag.variables[1].value.as_deref(), Some("2"));
        assert_eq!(bag.variables[1].position.column, 8);
        assert_eq!(bag.variables[2].name, "Timeout");
        assert!(bag.variables[2].is_exported);
        assert_eq!(bag.variables[2].type_name, None);
        assert_eq!(bag.variables[2].value.as_deref(), Some("time.Second"));
        assert!(bag.variables.iter().all(|v| !v.is_const));

        assert_eq!(bag.constants.len(), 2);
        assert!(bag.constants.iter().all(|c| c.is_const));
        assert_eq!(bag.constants[0].type_name.as_deref(), Some("Kind"));
        assert_eq!(bag.constants[0].value.as_deref(), Some("iota"));
        assert_eq!(bag.constants[1].name, "KindB");
        assert_eq!(bag.constants[1].value, None);
        assert_eq!(bag.constants[1].type_name, None);
    }
}
