//! Type declarations: structs, interfaces, function types and aliases.

use regolint_core::types::{is_exported, FieldInfo, MethodInfo, TypeInfo, TypeKind};
use tree_sitter::Node;

use super::format::format_type;
use super::functions::{extract_params, extract_results};
use super::{field_children, named_children, SourceContext};

/// Every spec of one `type` declaration; grouped specs share the
/// declaration's doc.
pub(crate) fn extract(ctx: &SourceContext<'_>, decl: Node<'_>, doc: &str, out: &mut Vec<TypeInfo>) {
    for spec in named_children(decl) {
        if matches!(spec.kind(), "type_spec" | "type_alias" | "alias_declaration") {
            out.push(extract_spec(ctx, spec, doc));
        }
    }
}

fn extract_spec(ctx: &SourceContext<'_>, spec: Node<'_>, doc: &str) -> TypeInfo {
    let name = ctx.field_text(spec, "name").unwrap_or_default().to_string();
    let mut info = TypeInfo {
        is_exported: is_exported(&name),
        position: ctx.position(spec),
        doc: doc.to_string(),
        name,
        ..Default::default()
    };

    let Some(ty) = spec.child_by_field_name("type") else {
        return info;
    };
    match ty.kind() {
        "struct_type" => {
            info.kind = TypeKind::Struct;
            (info.fields, info.embeds) = struct_fields(ctx, ty);
        }
        "interface_type" => {
            info.kind = TypeKind::Interface;
            (info.methods, info.embeds) = interface_members(ctx, ty);
        }
        "function_type" => info.kind = TypeKind::Func,
        _ => info.kind = TypeKind::Alias,
    }
    info
}

fn struct_fields(ctx: &SourceContext<'_>, ty: Node<'_>) -> (Vec<FieldInfo>, Vec<String>) {
    let mut fields = Vec::new();
    let mut embeds = Vec::new();

    let Some(list) = named_children(ty)
        .into_iter()
        .find(|c| c.kind() == "field_declaration_list")
    else {
        return (fields, embeds);
    };

    for decl in named_children(list) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(type_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let mut type_name = format_type(ctx, type_node);
        let tags = ctx.field_text(decl, "tag").map(strip_tag).unwrap_or_default();

        let names = field_children(decl, "name");
        if names.is_empty() {
            // Embedded: `*T` keeps its star as in the source.
            let mut cursor = decl.walk();
            if decl.children(&mut cursor).any(|c| c.kind() == "*") {
                type_name = format!("*{type_name}");
            }
            embeds.push(type_name.clone());
            fields.push(FieldInfo {
                name: type_name.clone(),
                type_name,
                tags,
                is_exported: false,
                is_embedded: true,
                position: ctx.position(decl),
            });
            continue;
        }

        for name in names {
            let name_text = ctx.text(name);
            fields.push(FieldInfo {
                name: name_text.to_string(),
                type_name: type_name.clone(),
                tags: tags.clone(),
                is_exported: is_exported(name_text),
                is_embedded: false,
                position: ctx.position(name),
            });
        }
    }

    (fields, embeds)
}

fn interface_members(ctx: &SourceContext<'_>, ty: Node<'_>) -> (Vec<MethodInfo>, Vec<String>) {
    let mut methods = Vec::new();
    let mut embeds = Vec::new();

    for member in named_children(ty) {
        match member.kind() {
            "method_elem" | "method_spec" => {
                let name = ctx.field_text(member, "name").unwrap_or_default().to_string();
                methods.push(MethodInfo {
                    is_exported: is_exported(&name),
                    parameters: member
                        .child_by_field_name("parameters")
                        .map(|p| extract_params(ctx, p))
                        .unwrap_or_default(),
                    returns: member
                        .child_by_field_name("result")
                        .map(|r| extract_results(ctx, r))
                        .unwrap_or_default(),
                    name,
                });
            }
            _ => embeds.push(format_type(ctx, member)),
        }
    }

    (methods, embeds)
}

/// Raw tag text without its backquotes.
fn strip_tag(raw: &str) -> String {
    raw.strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(raw)
        .to_string()
}
