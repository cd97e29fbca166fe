//! Filesystem boundary bound to one target directory.
//!
//! Every name is joined onto the target directory and must be a single file
//! name component, so a rename can never leave the directory.
//!
//! Renaming onto an existing target uses the platform's native `rename`
//! semantics through `std::fs::rename`: an existing regular file at the
//! target is replaced (Unix `rename(2)`, Windows `MoveFileExW` with
//! `MOVEFILE_REPLACE_EXISTING`), while an existing directory at the target
//! makes the call fail.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::validator::filename_problem;

/// Existence probe and rename primitive for a single directory
#[derive(Debug, Clone)]
pub struct DirectoryFs {
    dir: PathBuf,
}

impl DirectoryFs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        match filename_problem(name) {
            Some(problem) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file name {:?}: {}", name, problem),
            )),
            None => Ok(self.dir.join(name)),
        }
    }

    /// Whether any entry named `name` is present (files, directories and
    /// symlinks, dangling or not). Invalid names never exist.
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name)
            .map(|path| fs::symlink_metadata(path).is_ok())
            .unwrap_or(false)
    }

    /// Rename `original` to `new` inside the directory
    pub fn rename(&self, original: &str, new: &str) -> io::Result<()> {
        let from = self.resolve(original)?;
        let to = self.resolve(new)?;
        fs::rename(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rename_within_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let fs_ops = DirectoryFs::new(dir.path());
        fs_ops.rename("a.txt", "b.txt").unwrap();

        assert!(!fs_ops.exists("a.txt"));
        assert!(fs_ops.exists("b.txt"));
    }

    #[test]
    fn test_rename_rejects_path_components() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let fs_ops = DirectoryFs::new(dir.path());
        let err = fs_ops.rename("a.txt", "sub/a.txt").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("sub").join("a.txt").exists());
    }

    #[test]
    fn test_rename_replaces_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "new content").unwrap();
        fs::write(dir.path().join("out.txt"), "old content").unwrap();

        let fs_ops = DirectoryFs::new(dir.path());
        fs_ops.rename("a.txt", "out.txt").unwrap();

        let content = fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(content, "new content");
        assert!(!fs_ops.exists("a.txt"));
    }

    #[test]
    fn test_exists_counts_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("folder")).unwrap();

        let fs_ops = DirectoryFs::new(dir.path());
        assert!(fs_ops.exists("folder"));
        assert!(!fs_ops.exists("missing"));
        assert!(!fs_ops.exists(""));
    }
}
