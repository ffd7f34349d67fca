//! Failure collection across workers.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::Task;

/// A generation task that failed to render or write.
#[derive(Debug, Error)]
#[error("{language} output '{output}' for module '{module}': {message}")]
pub struct TaskError {
    module: String,
    language: &'static str,
    output: PathBuf,
    message: String,
}

impl TaskError {
    /// Build from the task that failed and its error, keeping the full cause chain.
    pub fn new(task: &Task, error: &eyre::Report) -> Self {
        Self {
            module: task.module().name().to_string(),
            language: task.language(),
            output: task.output().to_path_buf(),
            message: format!("{:#}", error),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The underlying error text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Append-only, thread-safe list of task errors.
///
/// Entries keep arrival order. With several workers failing concurrently the
/// first entry depends on thread timing and may differ between runs.
#[derive(Debug, Default)]
pub struct ErrorSet {
    list: Mutex<Vec<TaskError>>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error. The lock is held only for the push.
    pub fn add(&self, error: TaskError) {
        self.list.lock().push(error);
    }

    pub fn len(&self) -> usize {
        self.list.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.lock().is_empty()
    }

    /// Text of the first recorded error.
    pub fn first_message(&self) -> Option<String> {
        self.list.lock().first().map(ToString::to_string)
    }

    /// Take every recorded error, in arrival order.
    pub fn into_vec(self) -> Vec<TaskError> {
        self.list.into_inner()
    }
}
