//! Import declarations.

use regolint_core::types::ImportInfo;
use tree_sitter::Node;

use super::{named_children, SourceContext};

pub(crate) fn extract(ctx: &SourceContext<'_>, decl: Node<'_>, out: &mut Vec<ImportInfo>) {
    for child in named_children(decl) {
        match child.kind() {
            "import_spec" => out.extend(import_info(ctx, child)),
            "import_spec_list" => {
                for spec in named_children(child) {
                    if spec.kind() == "import_spec" {
                        out.extend(import_info(ctx, spec));
                    }
                }
            }
            _ => {}
        }
    }
}

fn import_info(ctx: &SourceContext<'_>, spec: Node<'_>) -> Option<ImportInfo> {
    let path = ctx.field_text(spec, "path")?;
    Some(ImportInfo {
        path: path.trim_matches(|c| c == '"' || c == '`').to_string(),
        alias: ctx.field_text(spec, "name").map(str::to_string),
        position: ctx.position(spec),
    })
}
