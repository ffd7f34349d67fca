//! Indented source writer shared by the back-ends.

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
