//! Core operations.
//!
//! This module contains the business logic for coder commands,
//! separated from CLI argument parsing and output rendering.

pub mod generate;
pub mod list;
pub mod scan;

pub use generate::{Plan, generate};
pub use list::list;
pub use scan::scan;
