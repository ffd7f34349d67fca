//! Native Rust back-end for the coder generator.
//!
//! Generates `Encode`/`Decode` impls for every `Codec` struct of a module.
//! The output file is meant to be `include!`d next to the declarations.

mod backend;
mod codec;

pub use backend::{DEFAULT_RUNTIME, RUNTIME_DIRECTIVE, RustBackend};
