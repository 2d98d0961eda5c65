//! Golden test runner for checking documents against snapshots

use crate::{diff::DiffEngine, snapshot::SnapshotManager, GoldenConfig, GoldenError, Result};
use colored::*;
use std::time::Instant;

/// Result of running a golden test
#[derive(Debug)]
pub struct TestResult {
    pub name: String,

    pub passed: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Diff output if comparison failed
    pub diff: Option<String>,

    pub duration_ms: u64,

    /// Whether the snapshot was created or updated
    pub updated: bool,
}

impl TestResult {
    pub fn print(&self, verbose: bool) {
        let status = if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(ref error) = self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(ref diff) = self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Snapshot updated".yellow());
        }
    }
}

/// Runner for golden tests
pub struct GoldenTestRunner {
    config: GoldenConfig,
    snapshot_manager: SnapshotManager,
    diff_engine: DiffEngine,
}

impl GoldenTestRunner {
    pub fn new(config: GoldenConfig) -> Self {
        let snapshot_manager = SnapshotManager::new(&config.snapshot_dir);
        let diff_engine = DiffEngine::new(config.diff_options.clone());

        Self {
            config,
            snapshot_manager,
            diff_engine,
        }
    }

    /// Mask matches of `pattern` in both texts before comparing
    pub fn add_volatile_pattern(&mut self, pattern: &str) -> Result<()> {
        self.diff_engine.add_volatile_pattern(pattern)
    }

    /// Compare `actual` with the snapshot called `name`
    pub fn check(&self, name: &str, actual: &str) -> Result<TestResult> {
        let start = Instant::now();

        if !self.snapshot_manager.exists(name) {
            if !self.config.create_missing {
                return Err(GoldenError::Snapshot(format!(
                    "Snapshot '{}' does not exist; rerun with UPDATE_GOLDEN=1 to create it",
                    name
                )));
            }
            self.snapshot_manager.create(name, actual, None)?;
            return Ok(self.finish(name, start, true, None, true));
        }

        let snapshot = self.snapshot_manager.load(name)?;
        let result = self.diff_engine.compare(&snapshot.content, actual);

        if result.matches {
            return Ok(self.finish(name, start, true, None, false));
        }

        if self.config.update_snapshots {
            self.snapshot_manager.update(name, actual)?;
            return Ok(self.finish(name, start, true, Some(result.diff_output), true));
        }

        Ok(self.finish(name, start, false, Some(result.diff_output), false))
    }

    /// Check several documents, failing with the names of all mismatches
    pub fn check_all<'a, I>(&self, documents: I) -> Result<Vec<TestResult>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let results = documents
            .into_iter()
            .map(|(name, actual)| self.check(name, actual))
            .collect::<Result<Vec<_>>>()?;

        let failed: Vec<&str> = results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.name.as_str())
            .collect();
        if !failed.is_empty() {
            for result in results.iter().filter(|r| !r.passed) {
                result.print(self.config.verbose);
            }
            return Err(GoldenError::SnapshotMismatch(failed.join(", ")));
        }
        Ok(results)
    }

    fn finish(
        &self,
        name: &str,
        start: Instant,
        passed: bool,
        diff: Option<String>,
        updated: bool,
    ) -> TestResult {
        let result = TestResult {
            name: name.to_string(),
            passed,
            error: (!passed).then(|| "Snapshot mismatch".to_string()),
            diff,
            duration_ms: start.elapsed().as_millis() as u64,
            updated,
        };
        if self.config.verbose {
            result.print(true);
        }
        result
    }
}
