//! Logging setup for the DynTokens CLI
//!
//! This module provides:
//! - Build ID generation and tracking
//! - Performance timing spans
//! - Structured logging setup
//! - Multiple output formats (console, JSON) and an optional log file

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{field, Span};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Global build ID for the current invocation
static BUILD_ID: OnceLock<String> = OnceLock::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter
    pub level: String,
    /// Output format: compact, full, json
    pub format: LogFormat,
    /// Enable console output
    pub console: bool,
    /// Optional file output path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Include thread IDs
    pub thread_ids: bool,
    /// Include file and line numbers
    pub source_location: bool,
    /// Log span close events with their durations
    pub span_events: bool,
    /// Per-module level overrides, e.g. `dyntokens_core::theme: debug`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub module_filter: BTreeMap<String, String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact format for everyday use
    Compact,
    /// Full format with all details
    Full,
    /// JSON structured format
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            console: true,
            file: None,
            thread_ids: false,
            source_location: false,
            span_events: false,
            module_filter: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Raise the detail of `self` according to the `-v` count
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        match verbosity {
            0 => {}
            1 => {
                self.level = "info".to_string();
            }
            2 => {
                self.level = "debug".to_string();
                self.source_location = true;
            }
            _ => {
                self.level = "trace".to_string();
                self.format = LogFormat::Full;
                self.source_location = true;
                self.thread_ids = true;
                self.span_events = true;
            }
        }
        self
    }

    /// Apply environment overrides
    pub fn merge_with_env(&mut self) {
        // RUST_LOG takes precedence
        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            self.level = rust_log;
        }

        if let Ok(format) = std::env::var("DYNTOKENS_LOG_FORMAT") {
            match parse_format(&format) {
                Some(format) => self.format = format,
                None => eprintln!("Warning: invalid DYNTOKENS_LOG_FORMAT '{}', using default", format),
            }
        }

        if let Ok(file) = std::env::var("DYNTOKENS_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }

        if let Ok(console) = std::env::var("DYNTOKENS_LOG_CONSOLE") {
            self.console = console.eq_ignore_ascii_case("true") || console == "1";
        }
    }
}

fn parse_format(value: &str) -> Option<LogFormat> {
    match value.to_lowercase().as_str() {
        "compact" => Some(LogFormat::Compact),
        "full" => Some(LogFormat::Full),
        "json" => Some(LogFormat::Json),
        _ => None,
    }
}

/// Initialize the global logging system.
///
/// The returned guard flushes the log file when dropped and must be held
/// until the process exits.
pub fn init_logging(config: LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = create_env_filter(&config)?;
    let (writer, guard, ansi) = create_writer(&config)?;
    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    // Each format is a distinct subscriber type
    match config.format {
        LogFormat::Compact => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(span_events)
                .compact()
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(span_events)
                .json()
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
        LogFormat::Full => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(writer)
                .with_target(true)
                .with_ansi(ansi)
                .with_thread_ids(config.thread_ids)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_span_events(span_events)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| Error::other(format!("Failed to initialize logging: {}", e)))?;
        }
    }

    let build_id = generate_build_id();
    BUILD_ID
        .set(build_id.clone())
        .map_err(|_| Error::other("Build ID was already set"))?;

    tracing::debug!(
        build_id = %build_id,
        config = ?config,
        "Logging system initialized"
    );

    Ok(guard)
}

/// Log file if configured, otherwise stderr or nowhere
fn create_writer(config: &LoggingConfig) -> Result<(BoxMakeWriter, Option<WorkerGuard>, bool)> {
    if let Some(path) = &config.file {
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::config(format!("Invalid log file path: {}", path.display())))?;
        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        std::fs::create_dir_all(&directory)?;

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        return Ok((BoxMakeWriter::new(writer), Some(guard), false));
    }

    if config.console {
        let ansi = std::io::stderr().is_terminal();
        Ok((BoxMakeWriter::new(std::io::stderr), None, ansi))
    } else {
        Ok((BoxMakeWriter::new(std::io::sink), None, false))
    }
}

/// Create environment filter based on configuration
fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    for (module, level) in &config.module_filter {
        filter = filter.add_directive(
            format!("{}={}", module, level)
                .parse()
                .map_err(|e| Error::config(format!("Invalid filter directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Generate a unique ID for this invocation
pub fn generate_build_id() -> String {
    format!("build_{}", Uuid::new_v4().simple())
}

/// Get the current build ID
pub fn current_build_id() -> Option<&'static str> {
    BUILD_ID.get().map(|s| s.as_str())
}

/// Create a span with build ID and timing
pub fn create_operation_span(operation: &str, details: Option<&str>) -> Span {
    tracing::info_span!(
        "operation",
        operation = operation,
        build_id = current_build_id().unwrap_or("unknown"),
        details = details.unwrap_or(""),
        duration_ms = field::Empty,
    )
}

/// Performance timing utilities
pub mod timing {
    use std::time::{Duration, Instant};
    use tracing::Span;

    /// A timer that records its duration on the operation span when dropped
    pub struct Timer {
        start: Instant,
        span: Span,
        operation: String,
    }

    impl Timer {
        pub fn new(operation: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, None),
                operation: operation.to_string(),
            }
        }

        pub fn with_details(operation: &str, details: &str) -> Self {
            Self {
                start: Instant::now(),
                span: super::create_operation_span(operation, Some(details)),
                operation: operation.to_string(),
            }
        }

        /// The operation span, for entering while the timed work runs
        pub fn span(&self) -> &Span {
            &self.span
        }

        /// Get elapsed time without finishing the timer
        pub fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let duration = self.start.elapsed();
            self.span.record("duration_ms", duration.as_millis() as u64);

            tracing::debug!(
                operation = %self.operation,
                duration_ms = duration.as_millis() as u64,
                "Operation completed"
            );
        }
    }
}
