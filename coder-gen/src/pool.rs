//! Bounded pool of workers draining a shared task queue.

use std::{
    fmt,
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{Receiver, sync_channel},
    },
    thread,
};

use codergen_core::Diff;
use parking_lot::Mutex;

use crate::{ErrorSet, Task, TaskError, Template};

/// Run-wide settings threaded through every worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Compute diffs but never write.
    pub dry_run: bool,
}

impl Settings {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Terminal state of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Content changed and was written.
    Written,
    /// Content changed but writing was disabled.
    Suppressed,
    /// Rendered content matched the file on disk.
    Unchanged,
    /// Rendering or writing failed.
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Written => "generated",
            Outcome::Suppressed => "not writing",
            Outcome::Unchanged => "no change",
            Outcome::Failed => "failed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a finished task, as seen by a [`StatusSink`].
#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    pub module: &'a str,
    pub language: &'static str,
    pub output: &'a Path,
    pub outcome: Outcome,
    /// Set when `outcome` is [`Outcome::Failed`].
    pub error: Option<&'a TaskError>,
}

/// Receives one status per task, from whichever worker ran it.
pub trait StatusSink: Sync {
    fn report(&self, status: &Status<'_>);
}

/// Sink that logs every status through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn report(&self, status: &Status<'_>) {
        let out = status.output.display();
        match status.error {
            Some(error) => {
                tracing::error!(out = %out, lang = status.language, "{}", error.message())
            }
            None => tracing::info!(out = %out, lang = status.language, "{}", status.outcome),
        }
    }
}

/// Per-outcome task counts of a pool run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub written: usize,
    pub suppressed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl Tally {
    /// Number of tasks that reached any outcome.
    pub fn total(&self) -> usize {
        self.written + self.suppressed + self.unchanged + self.failed
    }
}

#[derive(Default)]
struct Counters {
    written: AtomicUsize,
    suppressed: AtomicUsize,
    unchanged: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Written => &self.written,
            Outcome::Suppressed => &self.suppressed,
            Outcome::Unchanged => &self.unchanged,
            Outcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn tally(&self) -> Tally {
        Tally {
            written: self.written.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            unchanged: self.unchanged.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Fixed-size set of worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Pool with `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// Twice the available cores, leaving headroom for workers blocked on I/O.
    pub fn default_size() -> usize {
        thread::available_parallelism()
            .map(|n| n.get() * 2)
            .unwrap_or(4)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Feed `tasks` to the workers and wait until all of them are done.
    ///
    /// Tasks are published on the calling thread through a bounded queue, so
    /// dispatch and rendering overlap. Failures land in `errors` and never
    /// stop the other workers. Returns once the queue is closed and every
    /// worker has exited.
    pub fn run<I>(
        &self,
        tasks: I,
        settings: Settings,
        sink: &dyn StatusSink,
        errors: &ErrorSet,
    ) -> Tally
    where
        I: IntoIterator<Item = Task>,
    {
        let (sender, receiver) = sync_channel::<Task>(self.size);
        let queue = Mutex::new(receiver);
        let counters = Counters::default();

        thread::scope(|scope| {
            for id in 0..self.size {
                let queue = &queue;
                let counters = &counters;
                scope.spawn(move || worker(id, queue, settings, sink, errors, counters));
            }

            let mut published = 0usize;
            for task in tasks {
                if sender.send(task).is_err() {
                    break;
                }
                published += 1;
            }
            drop(sender);
            tracing::debug!(published, workers = self.size, "task queue closed");
        });

        counters.tally()
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(Self::default_size())
    }
}

fn worker(
    id: usize,
    queue: &Mutex<Receiver<Task>>,
    settings: Settings,
    sink: &dyn StatusSink,
    errors: &ErrorSet,
    counters: &Counters,
) {
    let mut template = Template::new();

    loop {
        // The guard is released before rendering starts.
        let next = queue.lock().recv();
        let Ok(mut task) = next else {
            break;
        };

        if settings.dry_run {
            task.suppress_write();
        }
        tracing::debug!(
            worker = id,
            module = task.module().name(),
            lang = task.language(),
            "rendering"
        );

        let mut status = Status {
            module: task.module().name(),
            language: task.language(),
            output: task.output(),
            outcome: Outcome::Failed,
            error: None,
        };

        match template.generate(&task) {
            Ok(Diff::Changed) if settings.dry_run => status.outcome = Outcome::Suppressed,
            Ok(Diff::Changed) => status.outcome = Outcome::Written,
            Ok(Diff::Unchanged) => status.outcome = Outcome::Unchanged,
            Err(e) => {
                let error = TaskError::new(&task, &e);
                sink.report(&Status {
                    error: Some(&error),
                    ..status
                });
                counters.record(Outcome::Failed);
                errors.add(error);
                continue;
            }
        }

        sink.report(&status);
        counters.record(status.outcome);
    }

    tracing::debug!(worker = id, rendered = template.rendered(), "worker finished");
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use codergen_ir::{FieldType, Module, StructDecl};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        EmitOptions,
        testing::{RecordingSink, StubBackend},
    };

    fn tasks(dir: &TempDir, count: usize, backend: StubBackend) -> Vec<Task> {
        let backend: Arc<dyn crate::Backend> = Arc::new(backend);
        (0..count)
            .map(|i| {
                let source = dir.path().join(format!("m{}.rs", i));
                let module = Module::builder(format!("m{}", i), source)
                    .add_struct(StructDecl::new("Point").field("x", FieldType::I32))
                    .finish();
                Task::new(
                    Arc::new(module),
                    Arc::clone(&backend),
                    dir.path().join(format!("m{}.out", i)),
                    Arc::new(EmitOptions::default()),
                )
            })
            .collect()
    }

    #[test]
    fn test_pool_size_is_at_least_one() {
        assert_eq!(WorkerPool::new(0).size(), 1);
        assert!(WorkerPool::default_size() >= 1);
    }

    #[test]
    fn test_every_task_reaches_an_outcome() {
        let dir = TempDir::new().unwrap();
        let sink = RecordingSink::default();
        let errors = ErrorSet::new();

        let tasks = tasks(&dir, 10, StubBackend::native());
        let tally = WorkerPool::new(3).run(tasks, Settings::default(), &sink, &errors);

        assert_eq!(tally.written, 10);
        assert_eq!(tally.total(), 10);
        assert_eq!(sink.len(), 10);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_second_run_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let pool = WorkerPool::new(4);
        let errors = ErrorSet::new();

        let settings = Settings::default();
        pool.run(tasks(&dir, 5, StubBackend::native()), settings, &TracingSink, &errors);
        let tally = pool.run(tasks(&dir, 5, StubBackend::native()), settings, &TracingSink, &errors);

        assert_eq!(tally, Tally { unchanged: 5, ..Tally::default() });
    }

    #[test]
    fn test_dry_run_suppresses_writes() {
        let dir = TempDir::new().unwrap();
        let sink = RecordingSink::default();
        let errors = ErrorSet::new();

        let tasks = tasks(&dir, 4, StubBackend::native());
        let tally = WorkerPool::new(2).run(tasks, Settings::dry_run(), &sink, &errors);

        assert_eq!(tally.suppressed, 4);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(sink.outcomes().iter().all(|o| *o == Outcome::Suppressed));
    }

    #[test]
    fn test_one_failure_does_not_stop_the_others() {
        let dir = TempDir::new().unwrap();
        let sink = RecordingSink::default();
        let errors = ErrorSet::new();

        let backend = StubBackend::native().failing_on("m3");
        let tasks = tasks(&dir, 10, backend);
        let tally = WorkerPool::new(2).run(tasks, Settings::default(), &sink, &errors);

        assert_eq!(tally.failed, 1);
        assert_eq!(tally.written, 9);
        assert_eq!(sink.len(), 10);
        let errors = errors.into_vec();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].module(), "m3");
        assert!(!dir.path().join("m3.out").exists());
    }

    #[test]
    fn test_empty_queue() {
        let errors = ErrorSet::new();
        let tally = WorkerPool::new(3).run(Vec::new(), Settings::default(), &TracingSink, &errors);
        assert_eq!(tally.total(), 0);
    }
}
