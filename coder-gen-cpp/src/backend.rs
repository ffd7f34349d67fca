use std::path::{Path, PathBuf};

use codergen_gen::{Backend, CodeBuilder, EmitOptions, check_fields};
use codergen_ir::{Module, StructDecl};
use eyre::{Result, bail};

use crate::{
    naming::{field_name, is_namespace},
    order::{definition_order, forward_declarations},
    types::cpp_type,
};

/// Directive enabling C++ output; its value is the namespace.
pub const NAMESPACE_DIRECTIVE: &str = "cpp";

/// Directive overriding the runtime header include.
pub const RUNTIME_DIRECTIVE: &str = "cpp.runtime";

/// Runtime header included when the module does not name one.
pub const DEFAULT_RUNTIME_HEADER: &str = "coder/runtime.h";

/// C++ back-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppBackend;

impl CppBackend {
    pub fn new() -> Self {
        Self
    }

    /// Namespace for `module`: the directive value, or the module path.
    fn namespace(&self, module: &Module) -> Result<String> {
        let namespace = match module.directive(NAMESPACE_DIRECTIVE) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => module.name().to_string(),
        };
        if !is_namespace(&namespace) {
            bail!("invalid C++ namespace '{}'", namespace);
        }
        Ok(namespace)
    }

    fn runtime_header<'m>(&self, module: &'m Module) -> Result<&'m str> {
        let header = module
            .directive(RUNTIME_DIRECTIVE)
            .unwrap_or(DEFAULT_RUNTIME_HEADER);
        if header.is_empty() || header.contains(['"', '<', '>', '\n']) {
            bail!("invalid {} header '{}'", RUNTIME_DIRECTIVE, header);
        }
        Ok(header)
    }

    fn include_guard(module: &Module) -> String {
        let segments: Vec<String> = module.segments().map(str::to_uppercase).collect();
        format!("CODER_{}_H_", segments.join("_"))
    }

    fn render_struct(&self, builder: &mut CodeBuilder, decl: &StructDecl) -> Result<()> {
        for line in &decl.docs {
            builder.push_doc("//", line);
        }
        builder.push_open(&format!("struct {} {{", decl.name));
        for field in &decl.fields {
            builder.push_line(&format!("{} {};", cpp_type(&field.ty)?, field_name(&field.name)));
        }
        builder.push_close("};").push_blank();

        if decl.fields.is_empty() {
            builder
                .push_line(&format!(
                    "inline void encode(coder::Encoder&, const {}&) {{}}",
                    decl.name
                ))
                .push_blank()
                .push_line(&format!(
                    "inline bool decode(coder::Decoder&, {}&) {{ return true; }}",
                    decl.name
                ));
            return Ok(());
        }

        builder.push_open(&format!(
            "inline void encode(coder::Encoder& e, const {}& v) {{",
            decl.name
        ));
        for field in &decl.fields {
            builder.push_line(&format!("encode(e, v.{});", field_name(&field.name)));
        }
        builder.push_close("}").push_blank();

        builder.push_open(&format!("inline bool decode(coder::Decoder& d, {}& v) {{", decl.name));
        for field in &decl.fields {
            builder.push_line(&format!(
                "if (!decode(d, v.{})) return false;",
                field_name(&field.name)
            ));
        }
        builder.push_line("return true;").push_close("}");
        Ok(())
    }
}

impl Backend for CppBackend {
    fn language(&self) -> &'static str {
        "cpp"
    }

    fn directive(&self) -> Option<&'static str> {
        Some(NAMESPACE_DIRECTIVE)
    }

    /// `<root>/<module path>.h`.
    fn destination(&self, module: &Module, root: Option<&Path>) -> PathBuf {
        let mut path = root.map(Path::to_path_buf).unwrap_or_default();
        let segments: Vec<&str> = module.segments().collect();
        if let Some((last, parents)) = segments.split_last() {
            path.extend(parents);
            path.push(format!("{}.h", last));
        }
        path
    }

    fn render(&self, module: &Module, options: &EmitOptions) -> Result<String> {
        check_fields(module)?;
        let namespace = self.namespace(module)?;
        let runtime = self.runtime_header(module)?;
        let guard = Self::include_guard(module);
        let structs = definition_order(module)?;

        let mut builder = CodeBuilder::cpp()
            .raw(&options.header(module).render("//"))
            .line(&format!("#ifndef {}", guard))
            .line(&format!("#define {}", guard))
            .blank()
            .line("#include <cstdint>")
            .line("#include <optional>")
            .line("#include <string>")
            .line("#include <vector>")
            .blank()
            .line(&format!("#include \"{}\"", runtime))
            .blank()
            .line(&format!("namespace {} {{", namespace));

        let declared = forward_declarations(&structs);
        if !declared.is_empty() {
            builder.push_blank();
            for name in declared {
                builder.push_line(&format!("struct {};", name));
            }
        }
        for decl in structs {
            builder.push_blank();
            self.render_struct(&mut builder, decl)?;
        }

        Ok(builder
            .blank()
            .line(&format!("}}  // namespace {}", namespace))
            .blank()
            .line(&format!("#endif  // {}", guard))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use codergen_ir::FieldType;

    use super::*;

    fn module(namespace: &str) -> Module {
        Module::builder("net::frame", "src/net/frame.rs")
            .directive(NAMESPACE_DIRECTIVE, namespace)
            .add_struct(StructDecl::new("Frame").field("len", FieldType::U16))
            .finish()
    }

    #[test]
    fn test_destination_mirrors_module_path() {
        assert_eq!(
            CppBackend.destination(&module(""), Some(Path::new("/cpp"))),
            PathBuf::from("/cpp/net/frame.h")
        );
    }

    #[test]
    fn test_namespace_defaults_to_module_path() {
        let out = CppBackend.render(&module(""), &EmitOptions::default()).unwrap();
        assert!(out.contains("namespace net::frame {\n"));
        assert!(out.contains("#ifndef CODER_NET_FRAME_H_\n"));
    }

    #[test]
    fn test_namespace_from_directive() {
        let out = CppBackend
            .render(&module("example::wire"), &EmitOptions::default())
            .unwrap();
        assert!(out.contains("namespace example::wire {\n"));
        assert!(out.contains("}  // namespace example::wire\n"));
    }

    #[test]
    fn test_invalid_namespace_fails_render() {
        let err = CppBackend
            .render(&module("not a namespace"), &EmitOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid C++ namespace 'not a namespace'");
    }

    #[test]
    fn test_runtime_header_override() {
        let module = Module::builder("net", "src/net.rs")
            .directive(NAMESPACE_DIRECTIVE, "")
            .directive(RUNTIME_DIRECTIVE, "vendor/coder.hpp")
            .add_struct(StructDecl::new("Ping"))
            .finish();
        let out = CppBackend.render(&module, &EmitOptions::default()).unwrap();
        assert!(out.contains("#include \"vendor/coder.hpp\"\n"));
        assert!(out.contains("inline bool decode(coder::Decoder&, Ping&) { return true; }\n"));
    }

    #[test]
    fn test_recursive_tree_through_vector() {
        let module = Module::builder("tree", "src/tree.rs")
            .directive(NAMESPACE_DIRECTIVE, "")
            .add_struct(
                StructDecl::new("Node")
                    .field("value", FieldType::I64)
                    .field("children", FieldType::List(Box::new(FieldType::Named("Node".into())))),
            )
            .finish();

        let out = CppBackend.render(&module, &EmitOptions::default()).unwrap();
        assert!(out.contains("struct Node {\n  int64_t value;\n  std::vector<Node> children;\n};\n"));
        assert!(!out.contains("struct Node;\n"));
    }

    #[test]
    fn test_listed_struct_defined_later_is_forward_declared() {
        let module = Module::builder("org", "src/org.rs")
            .directive(NAMESPACE_DIRECTIVE, "")
            .add_struct(
                StructDecl::new("Group")
                    .field("members", FieldType::List(Box::new(FieldType::Named("Member".into())))),
            )
            .add_struct(StructDecl::new("Member").field("group", FieldType::Named("Group".into())))
            .finish();

        let out = CppBackend.render(&module, &EmitOptions::default()).unwrap();
        assert!(out.contains("namespace org {\n\nstruct Member;\n\nstruct Group {\n"));
    }
}
