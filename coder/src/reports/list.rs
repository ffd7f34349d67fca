//! List command report data structures.

use super::output::{Output, Report};

/// One scanned module.
#[derive(Debug)]
pub struct ModuleInfo {
    pub name: String,
    pub source: String,
    pub is_test: bool,
    /// `key = value` (or `key`) per directive, sorted.
    pub directives: Vec<String>,
    /// Struct names with their field shapes, e.g. `Point { x: i32, y: i32 }`.
    pub structs: Vec<String>,
}

/// Report data from scanning.
#[derive(Debug)]
pub struct ListReport {
    pub modules: Vec<ModuleInfo>,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.modules.is_empty() {
            out.preformatted("No Codec structs found");
            return;
        }

        for (i, module) in self.modules.iter().enumerate() {
            if i > 0 {
                out.newline();
            }
            let heading = if module.is_test {
                format!("{} (test)", module.name)
            } else {
                module.name.clone()
            };
            out.section(&heading);
            out.key_value_indented("source", &module.source);
            if !module.directives.is_empty() {
                out.key_value_indented("directives", &module.directives.join(", "));
            }
            for decl in &module.structs {
                out.list_item(decl);
            }
        }
    }
}
