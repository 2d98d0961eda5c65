//! Shared test support utilities for integration tests
#![allow(dead_code)]

use dyntokens_core::{BuildConfig, Builder, TransformRegistry};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory holding the DynUI fixture project
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/dynui")
}

/// Directory holding the golden snapshots of this crate
pub fn snapshot_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/snapshots")
}

/// Copy the fixture project into a fresh temporary directory
pub fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("tokens");
    fs::create_dir_all(&target).unwrap();

    for entry in fs::read_dir(fixture_dir().join("tokens")).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), target.join(entry.file_name())).unwrap();
    }
    dir
}

/// Builder for the default DynUI layout rooted at `root`
pub fn default_builder(root: &Path) -> Builder {
    Builder::new(
        BuildConfig::default().with_root(root),
        TransformRegistry::with_builtins(),
    )
}

/// Read a file of the build output directory
pub fn read_output(root: &Path, name: &str) -> String {
    fs::read_to_string(root.join("dist").join(name)).unwrap()
}

/// `--dyn-...` custom property names declared in a stylesheet, in order
pub fn declared_properties(css: &str) -> Vec<String> {
    css.lines()
        .filter_map(|line| line.trim().strip_prefix("--"))
        .filter_map(|rest| rest.split_once(':'))
        .map(|(name, _)| name.to_string())
        .collect()
}
