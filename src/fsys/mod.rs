//! Filesystem primitives
//!
//! Small trait over the handful of filesystem calls the rest of the crate
//! needs. Keeping the seam here lets the store and bundle discovery run
//! against any directory tree handed to them, and keeps every I/O failure on
//! a single error path (`std::io::Error`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations required by bundle discovery and the
/// configuration store.
pub trait FileSystem {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create a directory at `path`, including missing parents.
    fn create_directory(&self, path: &Path) -> io::Result<()>;

    /// Remove the file or directory tree at `path`.
    fn remove_file_tree(&self, path: &Path) -> io::Result<()>;

    /// Read the entire file at `path` as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the file at `path` with `contents`, creating it if absent.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// List the direct children of the directory at `path`.
    fn list_directory(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The host filesystem, backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

impl FileSystem for HostFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_file_tree(&self, path: &Path) -> io::Result<()> {
        if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            entries.push(entry?.path());
        }
        entries.sort();
        Ok(entries)
    }
}
