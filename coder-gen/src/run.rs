//! End-to-end orchestration of one generation run.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use codergen_ir::Module;
use thiserror::Error;

use crate::{
    Dispatcher, EmitOptions, ErrorSet, Settings, StatusSink, Tally, Target, TaskError,
    WorkerPool, export_signatures,
};

/// Failure of a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    /// At least one task failed. Displays the first recorded error.
    #[error("{}", first_error(.errors))]
    Generation { errors: Vec<TaskError> },

    #[error("failed to write signatures to '{path}'")]
    Signatures {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// Every task error, in arrival order. Empty for other variants.
    pub fn errors(&self) -> &[TaskError] {
        match self {
            RunError::Generation { errors } => errors,
            RunError::Signatures { .. } => &[],
        }
    }

    /// The representative task error.
    pub fn first(&self) -> Option<&TaskError> {
        self.errors().first()
    }
}

fn first_error(errors: &[TaskError]) -> String {
    match errors.first() {
        Some(error) => error.to_string(),
        None => "generation failed".to_string(),
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Modules handed to the run.
    pub modules: usize,
    pub tally: Tally,
    /// Manifest written by the run, if any.
    pub signatures: Option<PathBuf>,
}

impl RunSummary {
    pub fn tasks(&self) -> usize {
        self.tally.total()
    }

    /// Files whose content changed, whether or not they were written.
    pub fn changed(&self) -> usize {
        self.tally.written + self.tally.suppressed
    }
}

/// A configured generation run.
///
/// # Example
///
/// ```ignore
/// let summary = Generation::new(targets, Settings::default())
///     .with_workers(8)
///     .with_signatures("target/coder.signatures.json")
///     .run(&modules, &TracingSink)?;
/// ```
#[derive(Debug, Clone)]
pub struct Generation {
    targets: Vec<Target>,
    settings: Settings,
    options: EmitOptions,
    pool: WorkerPool,
    signatures: Option<PathBuf>,
}

impl Generation {
    pub fn new(targets: Vec<Target>, settings: Settings) -> Self {
        Self {
            targets,
            settings,
            options: EmitOptions::default(),
            pool: WorkerPool::default(),
            signatures: None,
        }
    }

    pub fn with_options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool = WorkerPool::new(workers);
        self
    }

    /// Export the signature manifest to `path` after a clean run.
    pub fn with_signatures(mut self, path: impl Into<PathBuf>) -> Self {
        self.signatures = Some(path.into());
        self
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    pub fn signatures(&self) -> Option<&Path> {
        self.signatures.as_deref()
    }

    /// Generate every eligible (module, target) pair.
    ///
    /// The run fails iff any task failed; the other tasks still complete.
    /// Signatures are exported only after a clean run, and never in a dry run.
    pub fn run(
        &self,
        modules: &[Arc<Module>],
        sink: &dyn StatusSink,
    ) -> Result<RunSummary, RunError> {
        let dispatcher = Dispatcher::new(self.targets.clone(), self.options.clone());
        let errors = ErrorSet::new();

        tracing::debug!(
            modules = modules.len(),
            targets = dispatcher.targets().len(),
            workers = self.pool.size(),
            dry_run = self.settings.dry_run,
            "starting generation"
        );
        let tally = self.pool.run(dispatcher.tasks(modules), self.settings, sink, &errors);

        if !errors.is_empty() {
            return Err(RunError::Generation {
                errors: errors.into_vec(),
            });
        }

        let signatures = match &self.signatures {
            Some(path) if !self.settings.dry_run => {
                export_signatures(path, modules).map_err(|source| RunError::Signatures {
                    path: path.clone(),
                    source,
                })?;
                Some(path.clone())
            }
            Some(path) => {
                tracing::info!(path = %path.display(), "not writing signatures");
                None
            }
            None => None,
        };

        Ok(RunSummary {
            modules: modules.len(),
            tally,
            signatures,
        })
    }
}
