//! Go syntax tree → `FactBag` transformation.
//!
//! One depth-first pass over the top-level declarations of a parsed file.
//! Function bodies get a secondary walk for calls, type usages and field
//! accesses. Output is a pure function of the source text.

mod body;
mod docs;
mod format;
mod functions;
mod imports;
mod types;
mod variables;

use regolint_core::types::{FactBag, PackageInfo, Position};
use tree_sitter::Node;

use crate::parsers::types::start_point;
use crate::parsers::ParsedFile;

/// Builds fact bags for files of one package.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    module_path: String,
    package_path: String,
}

impl Transformer {
    /// `package_path` is the import path of the package being transformed.
    pub fn new(module_path: impl Into<String>, package_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            package_path: package_path.into(),
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Transform one parsed file. `file_path` is recorded verbatim as
    /// `FactBag::file_path`; positions carry the file's base name.
    pub fn transform(&self, parsed: &ParsedFile, file_path: &str) -> FactBag {
        let ctx = SourceContext::new(parsed);

        let mut bag = FactBag {
            file_path: file_path.to_string(),
            module_path: self.module_path.clone(),
            package: PackageInfo {
                name: String::new(),
                path: self.package_path.clone(),
                doc: String::new(),
            },
            ..Default::default()
        };

        let root = parsed.root();
        let mut cursor = root.walk();
        let top: Vec<Node<'_>> = root.named_children(&mut cursor).collect();

        for (index, &node) in top.iter().enumerate() {
            match node.kind() {
                "package_clause" => {
                    if let Some(name) = first_named(node) {
                        bag.package.name = ctx.text(name).to_string();
                    }
                    let comments = docs::leading_comments(&top, index);
                    bag.package.doc = docs::doc_text(&ctx, &comments);
                }
                "import_declaration" => imports::extract(&ctx, node, &mut bag.imports),
                "function_declaration" | "method_declaration" => {
                    let comments = docs::leading_comments(&top, index);
                    let extracted = functions::extract(&ctx, node, &comments);
                    if let Some(body_node) = node.child_by_field_name("body") {
                        body::walk(&ctx, body_node, &extracted.info.name, &extracted.scope, &mut bag);
                    }
                    bag.functions.push(extracted.info);
                }
                "type_declaration" => {
                    let comments = docs::leading_comments(&top, index);
                    let doc = docs::doc_text(&ctx, &comments);
                    types::extract(&ctx, node, &doc, &mut bag.types);
                }
                "var_declaration" => variables::extract(&ctx, node, false, &mut bag.variables),
                "const_declaration" => variables::extract(&ctx, node, true, &mut bag.constants),
                _ => {}
            }
        }

        bag
    }
}

/// Source bytes and file name shared by the extractors.
pub(crate) struct SourceContext<'a> {
    source: &'a [u8],
    file: String,
}

impl<'a> SourceContext<'a> {
    fn new(parsed: &'a ParsedFile) -> Self {
        Self {
            source: parsed.source().as_bytes(),
            file: parsed.file_name(),
        }
    }

    pub(crate) fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    pub(crate) fn field_text(&self, node: Node<'_>, field: &str) -> Option<&'a str> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    pub(crate) fn position(&self, node: Node<'_>) -> Position {
        let (line, column) = start_point(node);
        Position::new(self.file.clone(), line, column)
    }
}

/// Named children of `node`, comments excluded.
pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

pub(crate) fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node).into_iter().next()
}

/// Every child attached under `field`, in source order.
pub(crate) fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}
