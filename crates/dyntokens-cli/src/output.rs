//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! rendering for build reports, theme role tables and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use dyntokens_core::theme::ValueOrigin;
use dyntokens_core::{BuildReport, Theme};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::trace;

/// How one semantic role of one theme was resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRow {
    pub role: String,
    pub value: String,
    /// `reference`, `literal` or `fallback`
    pub origin: String,
    /// Palette path the role points at, or the missing path for a fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Resolved roles of one theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeRoles {
    pub theme: String,
    pub roles: Vec<RoleRow>,
}

impl From<&Theme> for ThemeRoles {
    fn from(theme: &Theme) -> Self {
        let roles = theme
            .roles
            .iter()
            .map(|(role, resolved)| {
                let (origin, path) = match &resolved.origin {
                    ValueOrigin::Reference { path } => ("reference", Some(path.clone())),
                    ValueOrigin::Literal => ("literal", None),
                    ValueOrigin::Fallback { missing } => ("fallback", Some(missing.clone())),
                };
                RoleRow {
                    role: role.clone(),
                    value: resolved.value.to_string(),
                    origin: origin.to_string(),
                    path,
                }
            })
            .collect();

        Self {
            theme: theme.name.clone(),
            roles,
        }
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a build or check report
    fn format_build_report(&self, report: &BuildReport) -> Result<String>;

    /// Format the resolved roles of every theme
    fn format_theme_roles(&self, themes: &[ThemeRoles]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human output of arbitrary values falls back to pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_build_report(&self, report: &BuildReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_build_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_theme_roles(&self, themes: &[ThemeRoles]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_theme_roles_human(themes)),
            _ => self.format(&themes),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, progress: bool) -> Self {
        Self {
            format,
            use_color,
            show_progress: progress && !quiet && io::stderr().is_terminal(),
            quiet,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Writing data");
        self.emit(formatted)
    }

    /// Write a build or check report
    pub fn build_report(&mut self, report: &BuildReport) -> Result<()> {
        if self.quiet && self.is_human() {
            return Ok(());
        }
        let formatted = self.format.format_build_report(report)?;
        self.emit(formatted)
    }

    /// Write resolved theme roles
    pub fn theme_roles(&mut self, themes: &[ThemeRoles]) -> Result<()> {
        let formatted = self.format.format_theme_roles(themes)?;
        self.emit(formatted)
    }

    /// Machine formats are written as-is; YAML and human text already end
    /// with a newline, compact JSON does not
    fn emit(&mut self, formatted: String) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }
        let table = render_table(headers, &rows);
        let mut lines = table.lines();

        if let Some(header) = lines.next() {
            if self.use_color {
                self.writeln(&header.bold().to_string())?;
            } else {
                self.writeln(header)?;
            }
        }
        for line in lines {
            self.writeln(line)?;
        }
        Ok(())
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Align columns, header first, then a separator line
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| match widths.get(i) {
                Some(width) => format!("{:width$}", cell, width = width),
                None => cell.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" │ ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&render_row(headers.to_vec()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// Format a build report for human reading
fn format_build_report_human(report: &BuildReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Loaded {} token(s) from {} source file(s)\n",
        report.tokens,
        report.sources.len()
    ));

    for theme in &report.themes {
        output.push_str(&format!("Theme '{}': {} role(s)", theme.name, theme.roles));
        if theme.fallbacks.is_empty() {
            output.push('\n');
        } else {
            output.push_str(&format!(", {} from fallbacks\n", theme.fallbacks.len()));
            for fallback in &theme.fallbacks {
                output.push_str(&format!(
                    "  • {} (missing {})\n",
                    fallback.role, fallback.missing
                ));
            }
        }
    }

    output.push('\n');
    let rows: Vec<Vec<String>> = report
        .files
        .iter()
        .map(|file| {
            vec![
                file.platform.clone(),
                file.path.display().to_string(),
                file.format.to_string(),
                file.tokens.to_string(),
                file.bytes.to_string(),
            ]
        })
        .collect();
    output.push_str(&render_table(
        &["Platform", "File", "Format", "Tokens", "Bytes"],
        &rows,
    ));

    let verb = if report.written { "Wrote" } else { "Checked" };
    output.push_str(&format!("\n{} {} file(s)\n", verb, report.files.len()));
    output
}

/// Format theme role tables for human reading
fn format_theme_roles_human(themes: &[ThemeRoles]) -> String {
    let mut output = String::new();

    for (i, theme) in themes.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("Theme '{}'\n", theme.theme));
        let rows: Vec<Vec<String>> = theme
            .roles
            .iter()
            .map(|row| {
                vec![
                    row.role.clone(),
                    row.value.clone(),
                    match &row.path {
                        Some(path) => format!("{} {}", row.origin, path),
                        None => row.origin.clone(),
                    },
                ]
            })
            .collect();
        output.push_str(&render_table(&["Role", "Value", "Source"], &rows));
    }

    output
}
