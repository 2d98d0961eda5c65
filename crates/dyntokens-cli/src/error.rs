//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the token pipeline
    #[error(transparent)]
    Core(#[from] dyntokens_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(core) => core_exit_code(core),
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Pipeline failures use the 20s so scripts can tell them apart
fn core_exit_code(error: &dyntokens_core::Error) -> i32 {
    use dyntokens_core::Error as Core;

    match error.root() {
        Core::SourceParse { .. } => 20,
        Core::UnknownTransform { .. } => 21,
        Core::DuplicateTransform { .. } => 22,
        Core::UnresolvedValue { .. } => 23,
        Core::NameCollision { .. } => 24,
        Core::ThemeCoverage { .. } => 25,
        Core::UnknownFormat { .. } => 26,
        Core::EmissionWrite { .. } => 27,
        Core::Configuration { .. } => 5,
        Core::Platform { .. } => 2,
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = error.to_string();

    // Platform wrappers already include their cause in the message
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if !message.contains(&cause.to_string()) {
            message.push_str(&format!("\n  caused by: {}", cause));
        }
        source = cause.source();
    }

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}
