mod filter;

pub use filter::{AntPatterns, ClassFileFilter, FileFilter};

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Outcome of visiting one path during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEntry {
    File(PathBuf),
    /// A path the walk could not enter or resolve, such as a locked folder,
    /// a dangling link or a link loop.
    Unreadable { path: PathBuf, reason: String },
}

pub trait FileScanner {
    /// Walk `root` and list matching files together with the paths that
    /// could not be visited, in walk order.
    fn scan(&self, root: &Path) -> Vec<ScanEntry>;
}

/// Recursive scanner following symbolic links; results come in file name
/// order within each folder.
pub struct DirectoryScanner<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> DirectoryScanner<F> {
    #[must_use]
    pub const fn new(filter: F) -> Self {
        Self { filter }
    }

    fn visit(&self, entry: walkdir::Result<walkdir::DirEntry>, root: &Path) -> Option<ScanEntry> {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                let path = entry.into_path();
                self.filter.should_include(&path).then_some(ScanEntry::File(path))
            }
            Err(err) => {
                let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                let reason = err
                    .io_error()
                    .map_or_else(|| err.to_string(), ToString::to_string);
                Some(ScanEntry::Unreadable { path, reason })
            }
        }
    }
}

impl<F: FileFilter> FileScanner for DirectoryScanner<F> {
    fn scan(&self, root: &Path) -> Vec<ScanEntry> {
        WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| self.visit(entry, root))
            .collect()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
