//! Expansion of scanned modules into generation tasks.
//!
//! The native back-end generates for every module. A foreign back-end
//! generates for a module only when all of these hold:
//!
//! - its output root was configured,
//! - the module carries the back-end's directive,
//! - the module is not test-only.
//!
//! Test-only modules still get native output. That asymmetry is intentional
//! and pinned by tests.
//!
//! No two tasks of one pass write the same file. When two modules map to the
//! same output, the later task is marked as claimed and fails when run.

use std::{
    collections::{HashMap, hash_map::Entry},
    path::{Path, PathBuf},
    sync::Arc,
};

use codergen_ir::Module;

use crate::{Backend, EmitOptions, Task};

/// A requested back-end and its output root.
#[derive(Clone)]
pub struct Target {
    backend: Arc<dyn Backend>,
    root: Option<PathBuf>,
}

impl Target {
    /// Request `backend`, writing under `root` when given.
    pub fn new(backend: impl Backend + 'static, root: Option<PathBuf>) -> Self {
        Self {
            backend: Arc::new(backend),
            root,
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Whether `module` gets a task for this target.
    pub fn accepts(&self, module: &Module) -> bool {
        match self.backend.directive() {
            None => true,
            Some(directive) => {
                self.root.is_some() && !module.is_test() && module.directives().contains(directive)
            }
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("language", &self.backend.language())
            .field("root", &self.root)
            .finish()
    }
}

/// Turns modules into tasks for the requested targets.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    targets: Vec<Target>,
    options: Arc<EmitOptions>,
}

impl Dispatcher {
    pub fn new(targets: Vec<Target>, options: EmitOptions) -> Self {
        Self {
            targets,
            options: Arc::new(options),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Tasks for `modules`, lazily, in publication order: for each module,
    /// one task per accepting target in request order.
    pub fn tasks<'a>(&'a self, modules: &'a [Arc<Module>]) -> impl Iterator<Item = Task> + 'a {
        let mut claimed: HashMap<PathBuf, String> = HashMap::new();
        modules
            .iter()
            .flat_map(move |module| {
                self.targets
                    .iter()
                    .filter(move |target| target.accepts(module))
                    .map(move |target| (module, target))
            })
            .map(move |(module, target)| {
                let output = target.backend.destination(module, target.root());
                let task = Task::new(
                    Arc::clone(module),
                    Arc::clone(&target.backend),
                    output.clone(),
                    Arc::clone(&self.options),
                );
                match claimed.entry(output) {
                    Entry::Occupied(owner) => task.claimed_by(owner.get().as_str()),
                    Entry::Vacant(slot) => {
                        slot.insert(module.name().to_string());
                        task
                    }
                }
            })
    }

    /// All tasks for `modules`, collected.
    pub fn plan(&self, modules: &[Arc<Module>]) -> Vec<Task> {
        self.tasks(modules).collect()
    }
}
