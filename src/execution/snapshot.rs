//! Directory Snapshot
//!
//! Captures the regular files present in the target directory at one point in
//! time. The snapshot is the ground truth the plan validator checks proposals
//! against, and it is captured fresh for every run.
//!
//! # Usage
//!
//! ```rust,ignore
//! let snapshot = DirectorySnapshot::capture(Path::new("/home/me/Downloads"))?;
//! let report = validate(&snapshot, &plan, |name| snapshot.contains(name));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::SnapshotError;

/// Regular files in a single directory at capture time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorySnapshot {
    /// Directory the snapshot was taken of
    pub directory: PathBuf,
    /// File names, sorted
    files: Vec<String>,
    #[serde(skip)]
    index: HashSet<String>,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

impl DirectorySnapshot {
    /// Capture the regular files directly inside `dir`.
    ///
    /// Symlinks and subdirectories are excluded, and nothing below the top
    /// level is visited.
    pub fn capture(dir: &Path) -> Result<Self, SnapshotError> {
        let meta = fs::metadata(dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SnapshotError::NotFound(dir.to_path_buf()),
            _ => SnapshotError::Io {
                path: dir.to_path_buf(),
                source: e,
            },
        })?;

        if !meta.is_dir() {
            return Err(SnapshotError::NotADirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
        {
            let entry = entry.map_err(|e| SnapshotError::Io {
                path: dir.to_path_buf(),
                source: io::Error::from(e),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.file_name().to_str() {
                Some(name) => files.push(name.to_string()),
                None => {
                    // Renames are keyed by UTF-8 names; such a file can never be matched
                    tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                }
            }
        }

        files.sort();

        tracing::debug!(
            directory = %dir.display(),
            files = files.len(),
            "Captured directory snapshot"
        );

        Ok(Self::from_names(dir.to_path_buf(), files))
    }

    /// Build a snapshot from already-known names (no filesystem access)
    pub fn from_names<I, S>(directory: PathBuf, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut files = Vec::new();
        let mut index = HashSet::new();
        for name in names {
            let name = name.into();
            if index.insert(name.clone()) {
                files.push(name);
            }
        }

        Self {
            directory,
            files,
            index,
            captured_at: Utc::now(),
        }
    }

    /// File names in snapshot order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
