//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod generate;
mod list;
mod output;

pub use generate::{ChangedFile, FailureReport, GenerateReport};
pub use list::{ListReport, ModuleInfo};
#[cfg(test)]
pub use output::BufferOutput;
pub use output::{Output, Report, TerminalOutput};
