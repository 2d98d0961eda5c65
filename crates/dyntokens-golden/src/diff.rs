//! Diff engine for comparing generated documents line by line

use crate::snapshot::normalize_text;
use crate::{GoldenError, Result};
use colored::*;
use regex::Regex;
use similar::{ChangeTag, TextDiff};

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Unchanged lines shown around each change
    pub context_lines: usize,

    /// Normalize line endings and trailing whitespace before comparing
    pub normalize: bool,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            context_lines: 3,
            normalize: false,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    pub matches: bool,

    /// Human-readable diff output
    pub diff_output: String,

    pub summary: DiffSummary,
}

/// Summary of diff changes
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    /// 1-based line of the first expected line that was removed or replaced
    pub first_changed_line: Option<usize>,
}

/// Engine for comparing text documents
pub struct DiffEngine {
    options: DiffOptions,
    volatile_patterns: Vec<Regex>,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            volatile_patterns: Vec::new(),
        }
    }

    /// Mask every match of `pattern` before comparing
    pub fn add_volatile_pattern(&mut self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::Snapshot(format!("Invalid regex pattern: {}", e)))?;
        self.volatile_patterns.push(regex);
        Ok(())
    }

    /// Compare expected text with actual text
    pub fn compare(&self, expected: &str, actual: &str) -> DiffResult {
        let expected = self.prepare(expected);
        let actual = self.prepare(actual);

        if expected == actual {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                summary: DiffSummary::default(),
            };
        }

        DiffResult {
            matches: false,
            diff_output: self.generate_diff_output(&expected, &actual),
            summary: Self::collect_summary(&expected, &actual),
        }
    }

    fn prepare(&self, text: &str) -> String {
        let mut text = if self.options.normalize {
            normalize_text(text)
        } else {
            text.to_string()
        };
        for pattern in &self.volatile_patterns {
            text = pattern.replace_all(&text, "***MASKED***").into_owned();
        }
        text
    }

    fn generate_diff_output(&self, expected: &str, actual: &str) -> String {
        let diff = TextDiff::from_lines(expected, actual);
        let mut output = String::new();

        if self.options.colored {
            output.push_str(&"=== Diff Output ===\n".bold().to_string());
        } else {
            output.push_str("=== Diff Output ===\n");
        }

        let mut line_count = 0;
        for group in diff.grouped_ops(self.options.context_lines) {
            for op in group {
                for change in diff.iter_changes(&op) {
                    if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                        output.push_str("... (diff truncated) ...\n");
                        return output;
                    }

                    let line = match change.tag() {
                        ChangeTag::Delete if self.options.colored => {
                            format!("{}{}", "-".red(), change.to_string().red())
                        }
                        ChangeTag::Delete => format!("-{}", change),
                        ChangeTag::Insert if self.options.colored => {
                            format!("{}{}", "+".green(), change.to_string().green())
                        }
                        ChangeTag::Insert => format!("+{}", change),
                        ChangeTag::Equal => format!(" {}", change),
                    };
                    output.push_str(&line);
                    if change.missing_newline() {
                        output.push('\n');
                    }
                    line_count += 1;
                }
            }
        }

        output
    }

    fn collect_summary(expected: &str, actual: &str) -> DiffSummary {
        let mut summary = DiffSummary::default();
        let diff = TextDiff::from_lines(expected, actual);

        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Delete => {
                    summary.removed += 1;
                    if summary.first_changed_line.is_none() {
                        summary.first_changed_line = change.old_index().map(|i| i + 1);
                    }
                }
                ChangeTag::Insert => {
                    summary.added += 1;
                }
                ChangeTag::Equal => {}
            }
        }

        summary
    }

    /// Plain unified-style diff for error messages
    pub fn simple_diff(&self, expected: &str, actual: &str) -> String {
        let diff = TextDiff::from_lines(expected, actual);
        let mut output = String::new();

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            output.push_str(&format!("{}{}", sign, change));
        }

        output
    }
}
