//! Declaration model for the coder generator.
//!
//! This crate provides the in-memory representation of a scanned module
//! that every stage of the pipeline reads from.
//!
//! # Architecture
//!
//! ```text
//! *.rs sources → coder-scan (parsing) → coder-ir (modules) → coder-gen (dispatch, workers) → back-ends
//! ```
//!
//! The IR types are designed to be:
//! - Language-agnostic (no Rust/Java/C++-specific concerns)
//! - Immutable once built (a [`Module`] has no mutating accessors)
//! - Self-contained (no external dependencies beyond serde)

mod module;
mod signature;
mod types;

pub use module::{Directives, Module, ModuleBuilder};
pub use signature::{FieldSignature, ModuleSignature, StructSignature};
pub use types::{FieldDecl, FieldType, StructDecl};
