//! C++ back-end for the coder generator.
//!
//! Generates one include-guarded header per module carrying the `cpp`
//! directive. Structs are emitted in dependency order together with
//! `encode`/`decode` overloads built on the runtime header.

mod backend;
mod naming;
mod order;
mod types;

pub use backend::{CppBackend, DEFAULT_RUNTIME_HEADER, NAMESPACE_DIRECTIVE, RUNTIME_DIRECTIVE};
pub use naming::{CPP_KEYWORDS, field_name, is_namespace};
