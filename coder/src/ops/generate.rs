//! Generate operation - fan scanned modules out to the configured back-ends.

use std::{path::PathBuf, sync::Arc};

use codergen_cpp::CppBackend;
use codergen_gen::{
    EmitOptions, Generation, Outcome, RunError, Settings, Status, StatusSink, Target, TracingSink,
};
use codergen_ir::Module;
use codergen_java::JavaBackend;
use codergen_rust::RustBackend;
use parking_lot::Mutex;

use crate::reports::{ChangedFile, GenerateReport};

/// Everything a generate run needs, after merging flags with `coder.toml`.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub rust: bool,
    pub rust_out: Option<PathBuf>,
    pub java_out: Option<PathBuf>,
    pub cpp_out: Option<PathBuf>,
    pub workers: Option<usize>,
    pub signatures: Option<PathBuf>,
    pub copyright: Option<String>,
    pub settings: Settings,
}

impl Plan {
    /// Targets in dispatch order: native first, then foreign back-ends that
    /// have an output root.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        if self.rust {
            targets.push(Target::new(RustBackend::new(), self.rust_out.clone()));
        }
        if let Some(root) = &self.java_out {
            targets.push(Target::new(JavaBackend::new(), Some(root.clone())));
        }
        if let Some(root) = &self.cpp_out {
            targets.push(Target::new(CppBackend::new(), Some(root.clone())));
        }
        targets
    }

    pub fn generation(&self) -> Generation {
        let mut options = EmitOptions::default();
        if let Some(copyright) = &self.copyright {
            options = options.with_copyright(copyright.clone());
        }

        let mut generation = Generation::new(self.targets(), self.settings).with_options(options);
        if let Some(workers) = self.workers {
            generation = generation.with_workers(workers);
        }
        if let Some(path) = &self.signatures {
            generation = generation.with_signatures(path.clone());
        }
        generation
    }
}

/// Logs every status and collects the files that changed.
#[derive(Debug, Default)]
struct ReportSink {
    changed: Mutex<Vec<ChangedFile>>,
}

impl ReportSink {
    fn into_changed(self) -> Vec<ChangedFile> {
        let mut changed = self.changed.into_inner();
        changed.sort_by(|a, b| a.path.cmp(&b.path));
        changed
    }
}

impl StatusSink for ReportSink {
    fn report(&self, status: &Status<'_>) {
        TracingSink.report(status);
        if matches!(status.outcome, Outcome::Written | Outcome::Suppressed) {
            self.changed.lock().push(ChangedFile {
                language: status.language,
                path: status.output.to_path_buf(),
            });
        }
    }
}

/// Run `plan` over `modules`.
pub fn generate(plan: &Plan, modules: &[Arc<Module>]) -> Result<GenerateReport, RunError> {
    let generation = plan.generation();
    tracing::debug!(
        workers = generation.workers(),
        signatures = ?generation.signatures(),
        "generation planned"
    );

    let sink = ReportSink::default();
    let summary = generation.run(modules, &sink)?;

    Ok(GenerateReport {
        dry_run: plan.settings.dry_run,
        modules: summary.modules,
        tally: summary.tally,
        changed: sink.into_changed(),
        signatures: summary.signatures,
    })
}
