// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Declaration scanner for the coder generator.
//!
//! Discovers Rust source files, parses them with [`syn`] and turns every file
//! that declares `#[derive(Codec)]` structs into a finalized
//! [`codergen_ir::Module`].
//!
//! Module directives are inner doc lines:
//!
//! ```text
//! //! coder: java.package = com.example.shapes
//! //! coder: cpp
//! ```

mod error;
mod parse;
mod scanner;

pub use error::{Error, Result};
pub use parse::{DIRECTIVE_PREFIX, parse_source};
pub use scanner::Scanner;
