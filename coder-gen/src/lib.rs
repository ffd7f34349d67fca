//! Generation pipeline for the coder generator.
//!
//! This crate turns scanned modules into generated files:
//!
//! ```text
//! modules → Dispatcher (tasks per target) → WorkerPool (Template per worker) → ErrorSet → signatures
//! ```
//!
//! # Module Organization
//!
//! - [`backend`] - The [`Backend`] trait implemented by every target language
//! - [`builder`] - Indented source writer ([`CodeBuilder`], [`Indent`])
//! - [`dispatch`] - Expansion of modules into per-target [`Task`]s
//! - [`pool`] - Bounded worker pool and status reporting
//! - [`errors`] - Thread-safe error aggregation
//! - [`signature`] - Signature manifest export
//! - [`run`] - End-to-end orchestration ([`Generation`])
//! - [`testing`] - Test utilities (feature-gated)

pub mod backend;
pub mod builder;
pub mod dispatch;
pub mod errors;
pub mod pool;
pub mod run;
pub mod signature;
mod task;
mod template;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{Backend, EmitOptions, check_fields};
pub use builder::{CodeBuilder, Indent};
pub use dispatch::{Dispatcher, Target};
pub use errors::{ErrorSet, TaskError};
pub use pool::{Outcome, Settings, Status, StatusSink, Tally, TracingSink, WorkerPool};
pub use run::{Generation, RunError, RunSummary};
pub use signature::{SignatureManifest, export_signatures};
pub use task::Task;
pub use template::Template;
