//! Core utilities and types for the coder generator.
//!
//! This crate provides the change-detecting file sync and the naming helpers
//! shared by every back-end.

mod file;
mod header;
mod utils;

// File operations
pub use file::{Diff, diff_file, write_atomic};
// Generated-file headers
pub use header::{GENERATED_MARKER, Header};
// String utilities
pub use utils::{is_identifier, to_camel_case, to_pascal_case};
