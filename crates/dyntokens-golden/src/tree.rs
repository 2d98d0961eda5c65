//! Directory snapshots
//!
//! Reads every file below a directory into memory so two build outputs can be
//! compared file by file.

use crate::diff::{DiffEngine, DiffOptions};
use crate::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Contents of every file under a root, keyed by relative path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirSnapshot {
    pub files: BTreeMap<PathBuf, String>,
}

impl DirSnapshot {
    /// Read all files below `root`
    pub fn capture(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut files = BTreeMap::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();
            files.insert(relative, fs::read_to_string(entry.path())?);
        }

        Ok(Self { files })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

/// How two directory snapshots differ at one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirDifference {
    /// Present in expected only
    Missing(PathBuf),
    /// Present in actual only
    Extra(PathBuf),
    /// Present in both with different content
    Changed { path: PathBuf, diff: String },
}

/// Compare two snapshots; an empty result means they are identical
pub fn compare_dirs(expected: &DirSnapshot, actual: &DirSnapshot) -> Vec<DirDifference> {
    let engine = DiffEngine::new(DiffOptions {
        colored: false,
        ..Default::default()
    });
    let mut differences = Vec::new();

    for (path, content) in &expected.files {
        match actual.files.get(path) {
            None => differences.push(DirDifference::Missing(path.clone())),
            Some(other) if other != content => {
                let result = engine.compare(content, other);
                differences.push(DirDifference::Changed {
                    path: path.clone(),
                    diff: result.diff_output,
                });
            }
            Some(_) => {}
        }
    }

    for path in actual.files.keys() {
        if !expected.files.contains_key(path) {
            differences.push(DirDifference::Extra(path.clone()));
        }
    }

    differences
}
