//! The few filesystem calls configuration loading makes, behind a trait so
//! loader tests can run against an in-memory tree.

use std::path::{Path, PathBuf};

pub trait FileSystem {
    /// # Errors
    /// Returns the underlying I/O error when the file can't be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// True for a regular file; a folder named like the config is skipped.
    fn is_file(&self, path: &Path) -> bool;

    /// # Errors
    /// Fails when the working directory is gone or inaccessible.
    fn current_dir(&self) -> std::io::Result<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }
}
