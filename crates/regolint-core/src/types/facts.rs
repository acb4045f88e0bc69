//! Per-file fact bag and its member facts.
//!
//! This is the single source of truth for the JSON shape policies see as
//! `input`. Every collection preserves source appearance order, so two
//! transforms of identical text serialize byte-identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A location in source code. Line and column are 1-based; `file` is the
/// base name of the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Position {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// Root structure passed to policies for one Go file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactBag {
    pub file_path: String,
    pub module_path: String,
    pub package: PackageInfo,
    pub imports: Vec<ImportInfo>,
    pub functions: Vec<FunctionInfo>,
    pub types: Vec<TypeInfo>,
    pub variables: Vec<VariableInfo>,
    pub constants: Vec<VariableInfo>,
    pub calls: Vec<CallInfo>,
    pub type_usages: Vec<TypeUsageInfo>,
    pub field_accesses: Vec<FieldAccessInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub position: Position,
}

/// A function parameter or return value. Unnamed entries keep an empty name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Value of a doc-comment annotation: `@key value` or a bare `@key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Flag(bool),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub parameters: Vec<ParameterInfo>,
    pub returns: Vec<ParameterInfo>,
    pub is_exported: bool,
    pub is_test: bool,
    pub complexity: u32,
    pub line_count: u32,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, AnnotationValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tags: String,
    pub is_exported: bool,
    pub is_embedded: bool,
    pub position: Position,
}

/// A method signature declared inside an interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    pub returns: Vec<ParameterInfo>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Interface,
    Func,
    #[default]
    Alias,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    pub kind: TypeKind,
    pub is_exported: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<String>,
    pub position: Position,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

/// A `var` or `const` declaration entry; one per declared name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub is_exported: bool,
    pub is_const: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallInfo {
    /// Callee name (selector field for qualified calls).
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    pub in_function: String,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeUsageContext {
    CompositeLiteral,
    TypeAssertion,
    Conversion,
}

/// A syntactic reference to a type inside a function body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeUsageInfo {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub in_function: String,
    pub context: TypeUsageContext,
    pub position: Position,
}

/// A selector expression that is read rather than called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldAccessInfo {
    pub field: String,
    pub receiver: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub in_function: String,
    pub position: Position,
}

/// True iff the first byte of `name` is an uppercase ASCII letter.
pub fn is_exported(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_uppercase)
}
