//! Golden test infrastructure for DynTokens
//!
//! This crate provides snapshot testing for generated documents and a
//! directory comparison used to check that two builds are byte-identical.

pub mod diff;
pub mod runner;
pub mod snapshot;
pub mod tree;

use std::path::PathBuf;
use thiserror::Error;

pub use diff::{DiffEngine, DiffOptions, DiffResult};
pub use runner::{GoldenTestRunner, TestResult};
pub use snapshot::{Snapshot, SnapshotManager};
pub use tree::{compare_dirs, DirDifference, DirSnapshot};

/// Golden test error types
#[derive(Debug, Error)]
pub enum GoldenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Snapshot mismatch: {0}")]
    SnapshotMismatch(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

pub type Result<T> = std::result::Result<T, GoldenError>;

/// Configuration for golden tests
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    /// Directory for snapshots
    pub snapshot_dir: PathBuf,

    /// Whether to overwrite snapshots that do not match
    pub update_snapshots: bool,

    /// Whether to create missing snapshots
    pub create_missing: bool,

    pub diff_options: DiffOptions,

    pub verbose: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        let update_snapshots = env_flag("UPDATE_GOLDEN");

        Self {
            snapshot_dir: PathBuf::from("tests/snapshots"),
            update_snapshots,
            create_missing: update_snapshots,
            diff_options: DiffOptions::default(),
            verbose: false,
        }
    }
}

impl GoldenConfig {
    /// Create config from environment and defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(snapshot_dir) = std::env::var("GOLDEN_SNAPSHOT_DIR") {
            config.snapshot_dir = PathBuf::from(snapshot_dir);
        }
        config.verbose = env_flag("GOLDEN_VERBOSE");
        if std::env::var_os("NO_COLOR").is_some() {
            config.diff_options.colored = false;
        }

        config
    }

    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = dir.into();
        self
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Compare text against a named snapshot, panicking with a diff on mismatch
#[macro_export]
macro_rules! assert_golden {
    ($dir:expr, $name:expr, $actual:expr) => {{
        use $crate::{GoldenConfig, GoldenTestRunner};

        let config = GoldenConfig::from_env().with_snapshot_dir($dir);
        let runner = GoldenTestRunner::new(config);
        let result = runner
            .check($name, &$actual)
            .unwrap_or_else(|e| panic!("Golden test '{}' failed: {}", $name, e));
        if !result.passed {
            panic!(
                "Golden test '{}' failed:\n{}",
                $name,
                result.diff.unwrap_or_default()
            );
        }
    }};
}
