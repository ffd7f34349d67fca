use std::{
    io::{ErrorKind, Write},
    path::Path,
};

use eyre::{Result, WrapErr};
use tempfile::NamedTempFile;

/// Whether rendered content differs from what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diff {
    /// The file is missing or its content differs.
    Changed,
    /// The file already holds exactly this content.
    Unchanged,
}

impl Diff {
    pub fn is_changed(self) -> bool {
        matches!(self, Diff::Changed)
    }
}

/// Compare `content` against the file at `path` without touching it.
///
/// A missing file counts as changed.
pub fn diff_file(path: &Path, content: &str) -> Result<Diff> {
    match std::fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => Ok(Diff::Unchanged),
        Ok(_) => Ok(Diff::Changed),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Diff::Changed),
        Err(e) => Err(e).wrap_err_with(|| format!("Failed to read {}", path.display())),
    }
}

/// Replace the file at `path` with `content`.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the destination, so readers see either the old or the new
/// file, never a partial one. Missing parent directories are created.
///
/// A replaced file keeps its permissions. A new file gets the default mode
/// for the process umask.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .wrap_err_with(|| format!("Failed to create directory {}", parent.display()))?;

    let mut tmp = temp_file_in(parent)
        .wrap_err_with(|| format!("Failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(content.as_bytes())
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .wrap_err_with(|| format!("Failed to copy permissions of {}", path.display()))?;
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .wrap_err_with(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".coder");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // 0o666 before umask, as for any newly created file.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_atomic_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        write_atomic(&path, "hello").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_write_atomic_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("c").join("test.txt");

        write_atomic(&path, "nested").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "nested");
    }

    #[test]
    fn test_write_atomic_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        // Only the destination remains, no stray temporary files.
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_mode_of_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shared.rs");
        fs::write(&path, "stale").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomic(&path, "fresh").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        write_atomic(&path, "again").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let plain = temp.path().join("plain.rs");
        let path = temp.path().join("new.rs");
        fs::write(&plain, "content").unwrap();

        write_atomic(&path, "content").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[test]
    fn test_diff_missing_file_is_changed() {
        let temp = TempDir::new().unwrap();
        let diff = diff_file(&temp.path().join("missing.txt"), "x").unwrap();
        assert_eq!(diff, Diff::Changed);
    }

    #[test]
    fn test_diff_identical_is_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("same.txt");
        fs::write(&path, "same").unwrap();

        assert_eq!(diff_file(&path, "same").unwrap(), Diff::Unchanged);
        assert_eq!(diff_file(&path, "other").unwrap(), Diff::Changed);
    }
}
