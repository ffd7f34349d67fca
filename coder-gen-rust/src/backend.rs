use std::path::{Path, PathBuf};

use codergen_core::is_identifier;
use codergen_gen::{Backend, CodeBuilder, EmitOptions, check_fields};
use codergen_ir::{Module, StructDecl};
use eyre::{Result, bail};

use crate::codec::{Codec, Value};

/// Directive naming the runtime crate the generated impls target.
pub const RUNTIME_DIRECTIVE: &str = "rust.runtime";

/// Runtime crate used when the module does not name one.
pub const DEFAULT_RUNTIME: &str = "coder_runtime";

const OUTPUT_SUFFIX: &str = "_coder.rs";

/// The native back-end. Generates for every module.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }

    fn runtime<'m>(&self, module: &'m Module) -> Result<&'m str> {
        let Some(runtime) = module.directive(RUNTIME_DIRECTIVE) else {
            return Ok(DEFAULT_RUNTIME);
        };
        if runtime.is_empty() || !runtime.split("::").all(is_identifier) {
            bail!("invalid {} path '{}'", RUNTIME_DIRECTIVE, runtime);
        }
        Ok(runtime)
    }

    fn encode_impl(
        &self,
        builder: &mut CodeBuilder,
        codec: Codec<'_>,
        runtime: &str,
        decl: &StructDecl,
    ) -> Result<()> {
        builder.push_open(&format!("impl {}::Encode for {} {{", runtime, decl.name));
        if decl.fields.is_empty() {
            builder.push_line(&format!("fn encode(&self, _e: &mut {}::Encoder) {{}}", runtime));
        } else {
            builder.push_open(&format!("fn encode(&self, e: &mut {}::Encoder) {{", runtime));
            for field in &decl.fields {
                let place = format!("self.{}", field.name);
                let expr = codec.encode(&field.ty, Value::Place(&place), 0)?;
                builder.push_line(&format!("{};", expr));
            }
            builder.push_close("}");
        }
        builder.push_close("}");
        Ok(())
    }

    fn decode_impl(
        &self,
        builder: &mut CodeBuilder,
        codec: Codec<'_>,
        runtime: &str,
        decl: &StructDecl,
    ) -> Result<()> {
        let param = if decl.fields.is_empty() { "_d" } else { "d" };
        builder
            .push_open(&format!("impl {}::Decode for {} {{", runtime, decl.name))
            .push_open(&format!(
                "fn decode({}: &mut {}::Decoder<'_>) -> Result<Self, {}::Error> {{",
                param, runtime, runtime
            ));
        if decl.fields.is_empty() {
            builder.push_line("Ok(Self {})");
        } else {
            builder.push_open("Ok(Self {");
            for field in &decl.fields {
                builder.push_line(&format!("{}: {}?,", field.name, codec.decode(&field.ty)?));
            }
            builder.push_close("})");
        }
        builder.push_close("}").push_close("}");
        Ok(())
    }
}

impl Backend for RustBackend {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn directive(&self) -> Option<&'static str> {
        None
    }

    /// `<stem>_coder.rs` next to the source, or under `root` mirroring the
    /// module path.
    fn destination(&self, module: &Module, root: Option<&Path>) -> PathBuf {
        match root {
            Some(root) => {
                let mut path = root.to_path_buf();
                let segments: Vec<&str> = module.segments().collect();
                if let Some((last, parents)) = segments.split_last() {
                    path.extend(parents);
                    path.push(format!("{}{}", last, OUTPUT_SUFFIX));
                }
                path
            }
            None => {
                let source = module.source();
                let stem = source
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| module.short_name().to_string());
                source
                    .parent()
                    .unwrap_or(Path::new(""))
                    .join(format!("{}{}", stem, OUTPUT_SUFFIX))
            }
        }
    }

    fn render(&self, module: &Module, options: &EmitOptions) -> Result<String> {
        check_fields(module)?;
        let runtime = self.runtime(module)?;
        let codec = Codec::new(runtime);

        let mut builder = CodeBuilder::rust().raw(&options.header(module).render("//"));
        for (i, decl) in module.structs().iter().enumerate() {
            if i > 0 {
                builder.push_blank();
            }
            self.encode_impl(&mut builder, codec, runtime, decl)?;
            builder.push_blank();
            self.decode_impl(&mut builder, codec, runtime, decl)?;
        }
        Ok(builder.build())
    }
}
