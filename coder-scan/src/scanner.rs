//! Source discovery.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use codergen_core::GENERATED_MARKER;
use codergen_ir::Module;

use crate::{Error, Result, parse_source};

/// Suffix of a scan pattern that requests a recursive walk (`src/...`).
const RECURSIVE_SUFFIX: &str = "...";

/// Discovers source files and parses them into modules.
///
/// Scanning is two-phase: [`Scanner::scan`] collects files (it may be called
/// once per pattern), then [`Scanner::process`] parses everything collected
/// and returns the finalized modules.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    files: BTreeSet<PathBuf>,
}

impl Scanner {
    /// Create a scanner resolving relative patterns and module names against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files collected so far, sorted.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    /// Collect the files matched by `pattern`.
    ///
    /// A pattern is a `.rs` file, a directory (its direct `.rs` files) or a
    /// directory followed by `/...` (walked recursively, skipping `target`
    /// and hidden directories).
    pub fn scan(&mut self, pattern: &str) -> Result<()> {
        let (base, recursive) = match pattern.strip_suffix(RECURSIVE_SUFFIX) {
            Some(base) => (base.trim_end_matches(['/', '\\']), true),
            None => (pattern, false),
        };
        let base = if base.is_empty() { "." } else { base };
        let path = self.root.join(base);

        if path.is_file() {
            if is_rust_source(&path) {
                self.files.insert(path);
            }
            return Ok(());
        }
        if !path.is_dir() {
            return Err(Box::new(Error::NotFound { path }));
        }

        let before = self.files.len();
        self.collect_dir(&path, recursive)?;
        tracing::debug!(
            pattern,
            files = self.files.len() - before,
            "scanned pattern"
        );
        Ok(())
    }

    fn collect_dir(&mut self, dir: &Path, recursive: bool) -> Result<()> {
        let entries = std::fs::read_dir(dir).map_err(|e| io_error(dir, e))?;
        let mut subdirs = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| io_error(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| io_error(&path, e))?;
            if file_type.is_dir() {
                if recursive && !is_skipped_dir(&path) {
                    subdirs.push(path);
                }
            } else if is_rust_source(&path) {
                self.files.insert(path);
            }
        }

        subdirs.sort();
        for subdir in subdirs {
            self.collect_dir(&subdir, true)?;
        }
        Ok(())
    }

    /// Parse every collected file into modules, sorted by module name.
    ///
    /// Files generated by coder and files without `Codec` structs are skipped.
    pub fn process(&self) -> Result<Vec<Module>> {
        let mut modules: BTreeMap<String, Module> = BTreeMap::new();

        for path in &self.files {
            let src = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
            if is_generated(&src) {
                tracing::trace!(path = %path.display(), "skipping generated file");
                continue;
            }

            let name = self.module_name(path);
            let Some(module) = parse_source(&name, path, &src)? else {
                continue;
            };

            if let Some(existing) = modules.get(&name) {
                return Err(Box::new(Error::DuplicateModule {
                    name,
                    first: existing.source().to_path_buf(),
                    second: path.clone(),
                }));
            }
            tracing::debug!(
                module = %name,
                structs = module.structs().len(),
                test = module.is_test(),
                "processed module"
            );
            modules.insert(name, module);
        }

        Ok(modules.into_values().collect())
    }

    /// Module name for a file: its path relative to the root, `::`-joined,
    /// with the extension dropped and `mod.rs` folded into its directory.
    pub fn module_name(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if let Some(last) = segments.pop() {
            let stem = Path::new(&last)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or(last);
            if stem != "mod" || segments.is_empty() {
                segments.push(stem);
            }
        }
        segments.join("::")
    }
}

fn io_error(path: &Path, source: std::io::Error) -> Box<Error> {
    Box::new(Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_rust_source(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "rs")
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name == "target" || name.starts_with('.'))
        .unwrap_or(false)
}

fn is_generated(src: &str) -> bool {
    src.lines()
        .next()
        .map(|line| line.contains(GENERATED_MARKER))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const POINT: &str = "#[derive(Codec)]\npub struct Point { pub x: i32 }\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_module_names() {
        let scanner = Scanner::new("/work");
        assert_eq!(scanner.module_name(Path::new("/work/shapes.rs")), "shapes");
        assert_eq!(
            scanner.module_name(Path::new("/work/shapes/geometry.rs")),
            "shapes::geometry"
        );
        assert_eq!(scanner.module_name(Path::new("/work/shapes/mod.rs")), "shapes");
        assert_eq!(scanner.module_name(Path::new("/work/mod.rs")), "mod");
    }

    #[test]
    fn test_recursive_scan() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.rs", POINT);
        write(temp.path(), "nested/b.rs", POINT);
        write(temp.path(), "target/debug/c.rs", POINT);
        write(temp.path(), ".hidden/d.rs", POINT);
        write(temp.path(), "notes.txt", "not rust");

        let mut scanner = Scanner::new(temp.path());
        scanner.scan("./...").unwrap();
        let modules = scanner.process().unwrap();

        let names: Vec<_> = modules.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["a", "nested::b"]);
    }

    #[test]
    fn test_directory_scan_is_shallow() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.rs", POINT);
        write(temp.path(), "nested/b.rs", POINT);

        let mut scanner = Scanner::new(temp.path());
        scanner.scan(".").unwrap();
        assert_eq!(scanner.files().count(), 1);
    }

    #[test]
    fn test_repeated_patterns_deduplicate() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.rs", POINT);

        let mut scanner = Scanner::new(temp.path());
        scanner.scan("a.rs").unwrap();
        scanner.scan("...").unwrap();
        assert_eq!(scanner.process().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_pattern() {
        let temp = TempDir::new().unwrap();
        let mut scanner = Scanner::new(temp.path());
        let err = scanner.scan("nope/...").unwrap_err();
        assert!(matches!(*err, Error::NotFound { .. }));
    }

    #[test]
    fn test_generated_files_skipped() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "a_coder.rs",
            &format!("// {} from a. DO NOT EDIT.\n{}", GENERATED_MARKER, POINT),
        );

        let mut scanner = Scanner::new(temp.path());
        scanner.scan("...").unwrap();
        assert!(scanner.process().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_module_names() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "shapes.rs", POINT);
        write(temp.path(), "shapes/mod.rs", POINT);

        let mut scanner = Scanner::new(temp.path());
        scanner.scan("...").unwrap();
        let err = scanner.process().unwrap_err();
        assert!(matches!(*err, Error::DuplicateModule { ref name, .. } if name == "shapes"));
    }

    #[test]
    fn test_tests_directory_is_test_only() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "tests/fixtures.rs", POINT);

        let mut scanner = Scanner::new(temp.path());
        scanner.scan("...").unwrap();
        let modules = scanner.process().unwrap();
        assert_eq!(modules.len(), 1);
        assert!(modules[0].is_test());
    }
}
