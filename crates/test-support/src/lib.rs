#![deny(unsafe_code)]

//! Scratch directory trees for tests.
//!
//! Helpers panic with a descriptive message instead of returning errors;
//! they are only meant to run inside `#[test]` functions.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory removed when dropped, with helpers addressed by
/// paths relative to its root.
#[derive(Debug)]
pub struct TestTree {
    root: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temporary directory"),
        }
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `relative`, which need not exist.
    #[must_use]
    pub fn join(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Writes a file, creating parent directories as needed.
    pub fn file(&self, relative: &str, contents: &[u8]) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, contents).expect("write test file");
        path
    }

    /// Creates a directory and its parents.
    pub fn dir(&self, relative: &str) -> PathBuf {
        let path = self.join(relative);
        fs::create_dir_all(&path).expect("create test directory");
        path
    }

    /// Reads a file.
    #[must_use]
    pub fn read(&self, relative: &str) -> Vec<u8> {
        fs::read(self.join(relative)).expect("read test file")
    }

    /// Every entry below the root as a sorted list of `/`-separated relative
    /// paths, with directories suffixed by `/`.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        let mut entries = Vec::new();
        collect(self.path(), "", &mut entries);
        entries.sort();
        entries
    }
}

fn collect(dir: &Path, prefix: &str, entries: &mut Vec<String>) {
    for entry in fs::read_dir(dir).expect("read test directory") {
        let entry = entry.expect("directory entry");
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = format!("{prefix}{name}");
        if entry.path().is_dir() {
            entries.push(format!("{relative}/"));
            collect(&entry.path(), &format!("{relative}/"), entries);
        } else {
            entries.push(relative);
        }
    }
}

/// Returns the permission bits of `path`.
#[cfg(unix)]
#[must_use]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path).expect("inspect mode").permissions().mode() & 0o7777
}

/// Sets the permission bits of `path`.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("set mode");
}
