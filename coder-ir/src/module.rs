//! Scanned modules and their directives.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::StructDecl;

/// Directive annotations attached to a module.
///
/// Keys are unique. Iteration is sorted by name so anything rendered from
/// directives is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    entries: BTreeMap<String, String>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a directive, `None` if the module does not carry it.
    ///
    /// A directive declared without a value yields `Some("")`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One scanned source file and the structs declared in it.
///
/// Built with [`ModuleBuilder`] during scanning and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    source: PathBuf,
    directives: Directives,
    is_test: bool,
    structs: Vec<StructDecl>,
}

impl Module {
    /// Start building a module.
    pub fn builder(name: impl Into<String>, source: impl Into<PathBuf>) -> ModuleBuilder {
        ModuleBuilder {
            module: Module {
                name: name.into(),
                source: source.into(),
                directives: Directives::default(),
                is_test: false,
                structs: Vec::new(),
            },
        }
    }

    /// Module path relative to the scan root, e.g. `shapes::geometry`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path segments of [`Module::name`].
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split("::")
    }

    /// Last segment of the module name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Source file the module was scanned from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    /// Shorthand for `self.directives().get(name)`.
    pub fn directive(&self, name: &str) -> Option<&str> {
        self.directives.get(name)
    }

    /// Whether the module only exists for tests.
    pub fn is_test(&self) -> bool {
        self.is_test
    }

    pub fn structs(&self) -> &[StructDecl] {
        &self.structs
    }

    /// Find a declared struct by name.
    pub fn find_struct(&self, name: &str) -> Option<&StructDecl> {
        self.structs.iter().find(|s| s.name == name)
    }
}

/// Builder for [`Module`], consumed by [`ModuleBuilder::finish`].
#[derive(Debug)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    /// Set a directive. A later value for the same name replaces the earlier one.
    pub fn directive(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.module
            .directives
            .entries
            .insert(name.into(), value.into());
        self
    }

    pub fn test_only(mut self, is_test: bool) -> Self {
        self.module.is_test = is_test;
        self
    }

    pub fn add_struct(mut self, decl: StructDecl) -> Self {
        self.module.structs.push(decl);
        self
    }

    pub fn structs(mut self, decls: impl IntoIterator<Item = StructDecl>) -> Self {
        self.module.structs.extend(decls);
        self
    }

    /// Number of structs added so far.
    pub fn struct_count(&self) -> usize {
        self.module.structs.len()
    }

    /// Finalize the module.
    pub fn finish(self) -> Module {
        self.module
    }
}
