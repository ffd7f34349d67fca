use std::panic::{self, AssertUnwindSafe};

use codergen_core::{Diff, diff_file, write_atomic};
use eyre::{Result, WrapErr, bail, eyre};

use crate::Task;

/// Renders tasks and syncs their output with the disk.
///
/// Each worker owns one template.
#[derive(Debug, Default)]
pub struct Template {
    rendered: usize,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks rendered by this template.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Render `task` and write it if the content changed.
    ///
    /// The diff is always computed against the task's output file. Nothing is
    /// written when the task has no destination. A task whose output was
    /// claimed by another module fails without rendering.
    pub fn generate(&mut self, task: &Task) -> Result<Diff> {
        if let Some(owner) = task.conflict() {
            bail!(
                "{} output {} for module '{}' is already generated for module '{}'",
                task.language(),
                task.output().display(),
                task.module().name(),
                owner
            );
        }
        let content = self.render(task)?;
        self.rendered += 1;

        let diff = diff_file(task.output(), &content)?;
        if diff.is_changed() {
            if let Some(destination) = task.destination() {
                write_atomic(destination, &content)?;
            }
        }
        Ok(diff)
    }

    fn render(&self, task: &Task) -> Result<String> {
        let module = task.module();
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            task.backend().render(module, task.options())
        }))
        .map_err(|payload| {
            eyre!(
                "{} back-end panicked: {}",
                task.language(),
                panic_message(&*payload)
            )
        })?;

        rendered.wrap_err_with(|| {
            format!(
                "failed to render {} coders for module '{}'",
                task.language(),
                module.name()
            )
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown payload".to_string()
    }
}
