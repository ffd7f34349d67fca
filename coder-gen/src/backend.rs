//! Language back-end abstraction.

use std::path::{Path, PathBuf};

use codergen_core::Header;
use codergen_ir::Module;
use eyre::{Result, bail};

/// Trait for language-specific coder generators.
///
/// Implement this trait to add support for generating coders in a new language.
/// A back-end is shared by every worker, so rendering must not rely on
/// interior state: the same module and options always give the same bytes.
pub trait Backend: Send + Sync {
    /// Language identifier (e.g., "rust", "java", "cpp")
    fn language(&self) -> &'static str;

    /// Directive a module must carry for this back-end to generate for it.
    ///
    /// `None` marks the native back-end, which generates for every module.
    fn directive(&self) -> Option<&'static str>;

    /// Where the output for `module` goes.
    ///
    /// `root` is the configured output root. Foreign back-ends are only asked
    /// when a root was configured; the native back-end may get `None`.
    fn destination(&self, module: &Module, root: Option<&Path>) -> PathBuf;

    /// Render the coders for `module`.
    ///
    /// Fails on input the back-end cannot express: unsupported field shapes,
    /// unknown struct references, invalid directive values.
    fn render(&self, module: &Module, options: &EmitOptions) -> Result<String>;
}

/// Options shared by every task of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Copyright text placed under the generated-code marker.
    pub copyright: Option<String>,
}

impl EmitOptions {
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    /// Header for a file generated from `module`.
    pub fn header(&self, module: &Module) -> Header {
        Header::new(module.name()).with_copyright(self.copyright.clone())
    }
}

/// Check the field shapes of `module` before rendering.
///
/// Every field must be encodable and every named type must be a struct
/// declared in the same module.
pub fn check_fields(module: &Module) -> Result<()> {
    for decl in module.structs() {
        for field in &decl.fields {
            if let Some(text) = field.ty.find_unsupported() {
                bail!(
                    "field '{}.{}' has unsupported type '{}'",
                    decl.name,
                    field.name,
                    text
                );
            }
            if let Some(name) = field.ty.named() {
                if module.find_struct(name).is_none() {
                    bail!(
                        "field '{}.{}' refers to '{}', which is not declared in module '{}'",
                        decl.name,
                        field.name,
                        name,
                        module.name()
                    );
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use codergen_ir::{FieldType, StructDecl};

    use super::*;

    #[test]
    fn test_check_fields_accepts_local_references() {
        let module = Module::builder("graph", "graph.rs")
            .add_struct(StructDecl::new("Node").field("id", FieldType::U32))
            .add_struct(StructDecl::new("Edge").field(
                "ends",
                FieldType::List(Box::new(FieldType::Named("Node".into()))),
            ))
            .finish();
        assert!(check_fields(&module).is_ok());
    }

    #[test]
    fn test_check_fields_rejects_unknown_reference() {
        let module = Module::builder("graph", "graph.rs")
            .add_struct(StructDecl::new("Edge").field("from", FieldType::Named("Vertex".into())))
            .finish();
        let err = check_fields(&module).unwrap_err();
        assert!(err.to_string().contains("'Vertex'"));
    }

    #[test]
    fn test_check_fields_rejects_unsupported() {
        let module = Module::builder("graph", "graph.rs")
            .add_struct(StructDecl::new("Edge").field(
                "weights",
                FieldType::Option(Box::new(FieldType::Unsupported("[f32; 4]".into()))),
            ))
            .finish();
        let err = check_fields(&module).unwrap_err();
        assert_eq!(err.to_string(), "field 'Edge.weights' has unsupported type '[f32; 4]'");
    }

    #[test]
    fn test_header_carries_copyright() {
        let module = Module::builder("graph", "graph.rs").finish();
        let options = EmitOptions::default().with_copyright("Copyright (C) 2026 Example");
        let lines = options.header(&module).lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Copyright (C) 2026 Example");
    }
}
