//! Java back-end for the coder generator.
//!
//! Generates one `<Module>Coders` class per module carrying the
//! `java.package` directive, with a static nested class per struct.

mod backend;
mod codec;
mod naming;

pub use backend::{JavaBackend, PACKAGE_DIRECTIVE};
pub use naming::{JAVA_KEYWORDS, field_name, is_package_name};
