//! List operation - describe scanned modules.

use std::sync::Arc;

use codergen_ir::{Module, StructDecl};

use crate::reports::{ListReport, ModuleInfo};

/// Build a report describing `modules`.
pub fn list(modules: &[Arc<Module>]) -> ListReport {
    ListReport {
        modules: modules
            .iter()
            .map(|module| ModuleInfo {
                name: module.name().to_string(),
                source: module.source().display().to_string(),
                is_test: module.is_test(),
                directives: module
                    .directives()
                    .iter()
                    .map(|(key, value)| {
                        if value.is_empty() {
                            key.to_string()
                        } else {
                            format!("{} = {}", key, value)
                        }
                    })
                    .collect(),
                structs: module.structs().iter().map(describe).collect(),
            })
            .collect(),
    }
}

fn describe(decl: &StructDecl) -> String {
    if decl.fields.is_empty() {
        return decl.name.clone();
    }
    let fields: Vec<String> = decl
        .fields
        .iter()
        .map(|field| format!("{}: {}", field.name, field.ty))
        .collect();
    format!("{} {{ {} }}", decl.name, fields.join(", "))
}
