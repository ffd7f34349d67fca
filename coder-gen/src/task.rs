use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use codergen_ir::Module;

use crate::{Backend, EmitOptions};

/// One module bound to one back-end and one output file.
///
/// Created by the dispatcher, consumed by exactly one worker.
#[derive(Clone)]
pub struct Task {
    module: Arc<Module>,
    backend: Arc<dyn Backend>,
    output: PathBuf,
    destination: Option<PathBuf>,
    claimed_by: Option<String>,
    options: Arc<EmitOptions>,
}

impl Task {
    pub fn new(
        module: Arc<Module>,
        backend: Arc<dyn Backend>,
        output: PathBuf,
        options: Arc<EmitOptions>,
    ) -> Self {
        Self {
            module,
            backend,
            destination: Some(output.clone()),
            output,
            claimed_by: None,
            options,
        }
    }

    /// Mark the output as already claimed by `owner` in the same pass.
    ///
    /// Such a task fails instead of overwriting the owner's file.
    pub fn claimed_by(mut self, owner: impl Into<String>) -> Self {
        self.claimed_by = Some(owner.into());
        self
    }

    /// Module that claimed this task's output first, if not this one.
    pub fn conflict(&self) -> Option<&str> {
        self.claimed_by.as_deref()
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn language(&self) -> &'static str {
        self.backend.language()
    }

    /// The file this task produces, used for diffing and reporting.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Where rendered content is written; `None` means do not write.
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Clear the destination so rendering computes the diff without writing.
    pub fn suppress_write(&mut self) {
        self.destination = None;
    }

    pub fn options(&self) -> &EmitOptions {
        &self.options
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("module", &self.module.name())
            .field("language", &self.language())
            .field("output", &self.output)
            .field("destination", &self.destination)
            .field("claimed_by", &self.claimed_by)
            .finish()
    }
}
