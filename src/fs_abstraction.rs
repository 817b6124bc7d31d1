//! Filesystem abstraction layer for testability
//!
//! The list store only needs a handful of operations. Putting them behind a
//! trait lets tests simulate backup collisions and permission failures
//! without touching the real filesystem. Uses mockall for automatic mock
//! generation in test builds.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting filesystem operations for dependency injection.
///
/// # Example (testing)
/// ```ignore
/// use apache_cf_iplist::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_exists().returning(|_| false);
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem {
    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read file contents as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Copy a file from one location to another.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Write bytes to a file, creating or truncating it.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Append bytes to a file, creating it if it doesn't exist.
    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        file.write_all(contents)?;
        file.flush()
    }
}
