//! Generate and check report data structures.

use std::path::PathBuf;

use codergen_gen::{Tally, TaskError};

use super::output::{Output, Report};

/// A file whose content changed in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub language: &'static str,
    pub path: PathBuf,
}

/// Report data from a successful run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Whether writing was disabled.
    pub dry_run: bool,
    /// Number of scanned modules.
    pub modules: usize,
    /// Per-outcome task counts.
    pub tally: Tally,
    /// Changed files, sorted by path.
    pub changed: Vec<ChangedFile>,
    /// Signature manifest written by the run.
    pub signatures: Option<PathBuf>,
}

impl GenerateReport {
    /// Whether any output differs from what is on disk.
    pub fn has_drift(&self) -> bool {
        !self.changed.is_empty()
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if self.has_drift() {
            out.section(if self.dry_run { "Out of date" } else { "Generated" });
            for file in &self.changed {
                out.changed_item(&format!("{} ({})", file.path.display(), file.language));
            }
            out.newline();
        }

        let changed = if self.dry_run {
            format!("{} would change", self.tally.suppressed)
        } else {
            format!("{} written", self.tally.written)
        };
        out.preformatted(&format!(
            "{} module{}, {} task{}: {}, {} unchanged",
            self.modules,
            plural(self.modules),
            self.tally.total(),
            plural(self.tally.total()),
            changed,
            self.tally.unchanged
        ));

        if let Some(path) = &self.signatures {
            out.key_value("Signatures", &path.display().to_string());
        }
    }
}

/// Every error of a failed run.
#[derive(Debug)]
pub struct FailureReport<'a> {
    pub errors: &'a [TaskError],
}

impl Report for FailureReport<'_> {
    fn render(&self, out: &mut dyn Output) {
        for error in self.errors {
            out.error(&error.to_string());
        }
        out.newline();
        out.preformatted(&format!(
            "{} task{} failed",
            self.errors.len(),
            plural(self.errors.len())
        ));
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::BufferOutput;

    #[test]
    fn test_render_written() {
        let report = GenerateReport {
            dry_run: false,
            modules: 2,
            tally: Tally {
                written: 1,
                unchanged: 2,
                ..Tally::default()
            },
            changed: vec![ChangedFile {
                language: "java",
                path: PathBuf::from("java/com/example/NetCoders.java"),
            }],
            signatures: Some(PathBuf::from("target/coder.signatures.json")),
        };

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            vec![
                "Generated:",
                "  ~ java/com/example/NetCoders.java (java)",
                "",
                "2 modules, 3 tasks: 1 written, 2 unchanged",
                "Signatures: target/coder.signatures.json",
            ]
        );
    }

    #[test]
    fn test_render_clean_dry_run() {
        let report = GenerateReport {
            dry_run: true,
            modules: 1,
            tally: Tally {
                unchanged: 1,
                ..Tally::default()
            },
            changed: Vec::new(),
            signatures: None,
        };

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert!(!report.has_drift());
        assert_eq!(out.lines, vec!["1 module, 1 task: 0 would change, 1 unchanged"]);
    }
}
