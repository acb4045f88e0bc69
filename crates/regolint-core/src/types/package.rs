//! Package-level aggregation of per-file fact bags.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::facts::{CallInfo, FactBag, FunctionInfo, ImportInfo, PackageInfo, TypeInfo, VariableInfo};

/// Facts of every file in one package, with imports deduplicated by path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageFactBag {
    pub module_path: String,
    pub package: PackageInfo,
    pub files: Vec<FactBag>,
    pub all_imports: Vec<ImportInfo>,
    pub all_functions: Vec<FunctionInfo>,
    pub all_types: Vec<TypeInfo>,
    pub all_variables: Vec<VariableInfo>,
    pub all_constants: Vec<VariableInfo>,
    pub all_calls: Vec<CallInfo>,
}

impl PackageFactBag {
    /// Merge per-file bags in the given order. Module path and package info
    /// come from the first file; returns `None` for an empty slice.
    pub fn aggregate(files: &[FactBag]) -> Option<Self> {
        let first = files.first()?;

        let mut pkg = Self {
            module_path: first.module_path.clone(),
            package: first.package.clone(),
            files: Vec::with_capacity(files.len()),
            ..Default::default()
        };

        let mut seen: HashSet<&str> = HashSet::new();
        for file in files {
            pkg.files.push(file.clone());

            for import in &file.imports {
                if seen.insert(import.path.as_str()) {
                    pkg.all_imports.push(import.clone());
                }
            }

            pkg.all_functions.extend(file.functions.iter().cloned());
            pkg.all_types.extend(file.types.iter().cloned());
            pkg.all_variables.extend(file.variables.iter().cloned());
            pkg.all_constants.extend(file.constants.iter().cloned());
            pkg.all_calls.extend(file.calls.iter().cloned());
        }

        Some(pkg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::facts::Position;

    fn import(path: &str, file: &str, line: u32) -> ImportInfo {
        ImportInfo {
            path: path.to_string(),
            alias: None,
            position: Position::new(file, line, 2),
        }
    }

    fn bag(file: &str, imports: Vec<ImportInfo>, functions: &[&str]) -> FactBag {
        FactBag {
            file_path: format!("pkg/{file}"),
            module_path: "example.com/mod".to_string(),
            package: PackageInfo {
                name: "pkg".to_string(),
                path: "example.com/mod/pkg".to_string(),
                doc: String::new(),
            },
            imports,
            functions: functions
                .iter()
                .map(|name| FunctionInfo {
                    name: (*name).to_string(),
                    complexity: 1,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(PackageFactBag::aggregate(&[]).is_none());
    }

    #[test]
    fn imports_dedup_by_path_in_first_seen_order() {
        let files = vec![
            bag("a.go", vec![import("fmt", "a.go", 3), import("os", "a.go", 4)], &["A"]),
            bag("b.go", vec![import("os", "b.go", 3), import("strings", "b.go", 4), import("fmt", "b.go", 5)], &["B"]),
            bag("c.go", vec![import("net/http", "c.go", 3)], &[]),
        ];

        let pkg = PackageFactBag::aggregate(&files).unwrap();
        let paths: Vec<&str> = pkg.all_imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["fmt", "os", "strings", "net/http"]);
        // First occurrence wins, including its position.
        assert_eq!(pkg.all_imports[1].position.file, "a.go");
    }

    #[test]
    fn declarations_concatenate_in_file_order() {
        let files = vec![bag("a.go", vec![], &["A1", "A2"]), bag("b.go", vec![], &["B1"])];
        let pkg = PackageFactBag::aggregate(&files).unwrap();

        let names: Vec<&str> = pkg.all_functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A1", "A2", "B1"]);
        assert_eq!(pkg.files.len(), 2);
        assert_eq!(pkg.module_path, "example.com/mod");
        assert_eq!(pkg.package.name, "pkg");
    }
}
