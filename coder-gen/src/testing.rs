//! Test utilities for the generation pipeline.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! downstream crates that need a predictable back-end.

use std::path::{Path, PathBuf};

use codergen_ir::Module;
use eyre::{Result, bail};
use parking_lot::Mutex;

use crate::{Backend, CodeBuilder, EmitOptions, Outcome, Status, StatusSink};

/// A back-end that renders a plain listing of a module's structs.
///
/// Output is a pure function of the module and options. Unsupported field
/// shapes fail the same way a real back-end does.
#[derive(Debug, Clone)]
pub struct StubBackend {
    language: &'static str,
    directive: Option<&'static str>,
    fail_on: Option<String>,
    panics: bool,
}

impl StubBackend {
    /// Native stub: language `stub`, no directive.
    pub fn native() -> Self {
        Self {
            language: "stub",
            directive: None,
            fail_on: None,
            panics: false,
        }
    }

    /// Foreign stub gated on `directive`.
    pub fn foreign(language: &'static str, directive: &'static str) -> Self {
        Self {
            language,
            directive: Some(directive),
            fail_on: None,
            panics: false,
        }
    }

    /// Fail rendering for the module named `module`.
    pub fn failing_on(mut self, module: impl Into<String>) -> Self {
        self.fail_on = Some(module.into());
        self
    }

    /// Panic inside every render call.
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }
}

impl Backend for StubBackend {
    fn language(&self) -> &'static str {
        self.language
    }

    fn directive(&self) -> Option<&'static str> {
        self.directive
    }

    fn destination(&self, module: &Module, root: Option<&Path>) -> PathBuf {
        match root {
            Some(root) => {
                let stem = module.name().replace("::", "_");
                root.join(format!("{}.{}", stem, self.language))
            }
            None => module.source().with_extension(self.language),
        }
    }

    fn render(&self, module: &Module, options: &EmitOptions) -> Result<String> {
        if self.panics {
            panic!("stub back-end asked to panic");
        }
        if self.fail_on.as_deref() == Some(module.name()) {
            bail!("stub failure for module '{}'", module.name());
        }

        let mut builder = CodeBuilder::rust()
            .raw(&options.header(module).render("//"))
            .line(&format!("module {}", module.name()));
        for decl in module.structs() {
            builder.push_line(&format!("struct {}", decl.name));
            builder.push_indent();
            for field in &decl.fields {
                if let Some(text) = field.ty.find_unsupported() {
                    bail!("field '{}.{}' has unsupported type '{}'", decl.name, field.name, text);
                }
                builder.push_line(&format!("{}: {}", field.name, field.ty));
            }
            builder.push_dedent();
        }
        Ok(builder.build())
    }
}

/// One recorded status, owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub module: String,
    pub language: &'static str,
    pub output: PathBuf,
    pub outcome: Outcome,
    pub error: Option<String>,
}

/// Sink that keeps every status it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    statuses: Mutex<Vec<Recorded>>,
}

impl RecordingSink {
    pub fn len(&self) -> usize {
        self.statuses.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.lock().is_empty()
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.statuses.lock().iter().map(|s| s.outcome).collect()
    }

    /// Every status, sorted by output path.
    pub fn statuses(&self) -> Vec<Recorded> {
        let mut statuses = self.statuses.lock().clone();
        statuses.sort_by(|a, b| a.output.cmp(&b.output));
        statuses
    }
}

impl StatusSink for RecordingSink {
    fn report(&self, status: &Status<'_>) {
        self.statuses.lock().push(Recorded {
            module: status.module.to_string(),
            language: status.language,
            output: status.output.to_path_buf(),
            outcome: status.outcome,
            error: status.error.map(ToString::to_string),
        });
    }
}
