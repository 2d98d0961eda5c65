//! Snapshot management for golden tests
//!
//! A snapshot stores the expected text of one generated document together
//! with a little metadata, as pretty-printed JSON.

use crate::{GoldenError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A test snapshot containing expected output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the test
    pub name: String,

    pub metadata: SnapshotMetadata,

    /// Expected document text
    pub content: String,
}

/// Metadata about a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Version of the snapshot format
    pub version: String,

    pub created_at: String,

    pub updated_at: String,

    /// Description of what this tests
    pub description: Option<String>,
}

/// Manages reading and writing snapshots
pub struct SnapshotManager {
    snapshot_dir: PathBuf,
}

impl SnapshotManager {
    /// Create a new snapshot manager
    pub fn new(snapshot_dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    /// Load a snapshot from disk
    pub fn load(&self, name: &str) -> Result<Snapshot> {
        let path = self.snapshot_path(name);

        if !path.exists() {
            return Err(GoldenError::Snapshot(format!(
                "Snapshot '{}' not found at {}",
                name,
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save a snapshot to disk
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(&snapshot.name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = serde_json::to_string_pretty(snapshot)?;
        content.push('\n');
        fs::write(&path, content)?;

        Ok(())
    }

    /// Replace the content of an existing snapshot, keeping a backup
    pub fn update(&self, name: &str, new_content: &str) -> Result<()> {
        let mut snapshot = self.load(name)?;
        self.backup(name)?;

        snapshot.content = new_content.to_string();
        snapshot.metadata.updated_at = Utc::now().to_rfc3339();

        self.save(&snapshot)
    }

    /// Create a new snapshot
    pub fn create(&self, name: &str, content: &str, description: Option<String>) -> Result<Snapshot> {
        let now = Utc::now().to_rfc3339();

        let snapshot = Snapshot {
            name: name.to_string(),
            metadata: SnapshotMetadata {
                version: "1.0.0".to_string(),
                created_at: now.clone(),
                updated_at: now,
                description,
            },
            content: content.to_string(),
        };

        self.save(&snapshot)?;
        Ok(snapshot)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }

    /// Names of all snapshots, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut snapshots = Vec::new();

        if !self.snapshot_dir.exists() {
            return Ok(snapshots);
        }

        for entry in fs::read_dir(&self.snapshot_dir)? {
            let path = entry?.path();

            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    snapshots.push(stem.to_string());
                }
            }
        }

        snapshots.sort();
        Ok(snapshots)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.snapshot_path(name);

        if path.exists() {
            fs::remove_file(path)?;
        }

        Ok(())
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        let filename = if name.ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        };

        self.snapshot_dir.join(filename)
    }

    /// Copy a snapshot aside before it is overwritten
    pub fn backup(&self, name: &str) -> Result<()> {
        let source = self.snapshot_path(name);

        if !source.exists() {
            return Ok(());
        }

        let backup_path = self
            .snapshot_dir
            .join(format!("{}.backup.{}", name, Utc::now().timestamp()));
        fs::copy(source, backup_path)?;
        Ok(())
    }
}

/// Normalize line endings and trailing whitespace for comparison
pub fn normalize_text(text: &str) -> String {
    let mut out: String = text
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}
