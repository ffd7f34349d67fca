use std::path::{Path, PathBuf};

use codergen_core::to_pascal_case;
use codergen_gen::{Backend, CodeBuilder, EmitOptions, check_fields};
use codergen_ir::{FieldType, Module, StructDecl};
use eyre::{Result, bail};

use crate::{
    codec::{self, Locals, java_type, uses_list},
    naming::{field_name, is_package_name},
};

/// Directive carrying the Java package of a module.
pub const PACKAGE_DIRECTIVE: &str = "java.package";

/// Java back-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaBackend;

impl JavaBackend {
    pub fn new() -> Self {
        Self
    }

    /// Name of the outer class generated for `module`.
    pub fn class_name(module: &Module) -> String {
        format!("{}Coders", to_pascal_case(module.name()))
    }

    fn package<'m>(&self, module: &'m Module) -> Result<&'m str> {
        let package = module.directive(PACKAGE_DIRECTIVE).unwrap_or_default();
        if !is_package_name(package) {
            bail!("invalid {} '{}'", PACKAGE_DIRECTIVE, package);
        }
        Ok(package)
    }

    fn render_struct(&self, builder: &mut CodeBuilder, decl: &StructDecl) -> Result<()> {
        if !decl.docs.is_empty() {
            builder.push_line("/**");
            for line in &decl.docs {
                builder.push_doc(" *", line);
            }
            builder.push_line(" */");
        }
        builder.push_open(&format!("public static final class {} {{", decl.name));

        for field in &decl.fields {
            let ty = java_type(&field.ty, matches!(field.ty, FieldType::Option(_)))?;
            builder.push_line(&format!("public {} {};", ty, field_name(&field.name)));
        }
        if !decl.fields.is_empty() {
            builder.push_blank();
        }

        builder.push_open("public void encode(DataOutput out) throws IOException {");
        let mut locals = Locals::default();
        for field in &decl.fields {
            let expr = format!("this.{}", field_name(&field.name));
            codec::encode(builder, &field.ty, &expr, &mut locals)?;
        }
        builder.push_close("}").push_blank();

        builder
            .push_open(&format!(
                "public static {} decode(DataInput in) throws IOException {{",
                decl.name
            ))
            .push_line(&format!("{} value = new {}();", decl.name, decl.name));
        let mut locals = Locals::default();
        for field in &decl.fields {
            let name = field_name(&field.name);
            let assign = |expr: &str| format!("value.{} = {};", name, expr);
            codec::decode(builder, &field.ty, &assign, &mut locals)?;
        }
        builder.push_line("return value;").push_close("}");

        builder.push_close("}");
        Ok(())
    }

    fn render_helpers(&self, builder: &mut CodeBuilder) {
        builder
            .push_open(
                "private static void writeString(DataOutput out, String value) throws IOException {",
            )
            .push_line("writeBytes(out, value.getBytes(StandardCharsets.UTF_8));")
            .push_close("}")
            .push_blank()
            .push_open("private static String readString(DataInput in) throws IOException {")
            .push_line("return new String(readBytes(in), StandardCharsets.UTF_8);")
            .push_close("}")
            .push_blank()
            .push_open(
                "private static void writeBytes(DataOutput out, byte[] value) throws IOException {",
            )
            .push_line("out.writeInt(value.length);")
            .push_line("out.write(value);")
            .push_close("}")
            .push_blank()
            .push_open("private static byte[] readBytes(DataInput in) throws IOException {")
            .push_line("byte[] value = new byte[in.readInt()];")
            .push_line("in.readFully(value);")
            .push_line("return value;")
            .push_close("}");
    }
}

impl Backend for JavaBackend {
    fn language(&self) -> &'static str {
        "java"
    }

    fn directive(&self) -> Option<&'static str> {
        Some(PACKAGE_DIRECTIVE)
    }

    /// `<root>/<package dirs>/<Module>Coders.java`.
    fn destination(&self, module: &Module, root: Option<&Path>) -> PathBuf {
        let mut path = root.map(Path::to_path_buf).unwrap_or_default();
        if let Some(package) = module.directive(PACKAGE_DIRECTIVE) {
            path.extend(package.split('.').filter(|s| !s.is_empty()));
        }
        path.push(format!("{}.java", Self::class_name(module)));
        path
    }

    fn render(&self, module: &Module, options: &EmitOptions) -> Result<String> {
        check_fields(module)?;
        let package = self.package(module)?;
        let class = Self::class_name(module);
        let lists = module
            .structs()
            .iter()
            .flat_map(|decl| &decl.fields)
            .any(|field| uses_list(&field.ty));

        let mut builder = CodeBuilder::java()
            .raw(&options.header(module).render("//"))
            .line(&format!("package {};", package))
            .blank()
            .line("import java.io.DataInput;")
            .line("import java.io.DataOutput;")
            .line("import java.io.IOException;")
            .line("import java.nio.charset.StandardCharsets;")
            .when(lists, |b| {
                b.line("import java.util.ArrayList;")
                    .line("import java.util.List;")
            })
            .blank()
            .line(&format!("public final class {} {{", class))
            .indent()
            .line(&format!("private {}() {{}}", class));

        for decl in module.structs() {
            builder.push_blank();
            self.render_struct(&mut builder, decl)?;
        }
        builder.push_blank();
        self.render_helpers(&mut builder);
        builder.push_close("}");

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(package: &str) -> Module {
        Module::builder("shapes::geometry", "src/shapes/geometry.rs")
            .directive(PACKAGE_DIRECTIVE, package)
            .add_struct(StructDecl::new("Point").field("x", FieldType::I32))
            .finish()
    }

    #[test]
    fn test_destination() {
        assert_eq!(
            JavaBackend.destination(&module("com.example.shapes"), Some(Path::new("/java"))),
            PathBuf::from("/java/com/example/shapes/ShapesGeometryCoders.java")
        );
    }

    #[test]
    fn test_invalid_package_fails_render() {
        let err = JavaBackend
            .render(&module("not a package!"), &EmitOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid java.package 'not a package!'");
    }

    #[test]
    fn test_list_imports_only_when_needed() {
        let out = JavaBackend
            .render(&module("com.example"), &EmitOptions::default())
            .unwrap();
        assert!(out.contains("package com.example;\n"));
        assert!(!out.contains("import java.util.List;"));
    }

    #[test]
    fn test_struct_docs_become_javadoc() {
        let module = Module::builder("net", "net.rs")
            .directive(PACKAGE_DIRECTIVE, "net")
            .add_struct(StructDecl::new("Ping").doc("Keep-alive probe."))
            .finish();
        let out = JavaBackend.render(&module, &EmitOptions::default()).unwrap();
        assert!(out.contains("    /**\n     * Keep-alive probe.\n     */\n    public static final class Ping {\n"));
    }
}
