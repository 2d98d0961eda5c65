//! Error types for the DynTokens core library
//!
//! Every failure aborts the current build. Errors raised while building a
//! particular output file are wrapped in [`Error::Platform`] so the caller can
//! tell which platform and destination failed.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for token pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    /// A token source file is malformed, unsupported, or collides with another
    #[error("Failed to parse token source '{}': {message}", .path.display())]
    SourceParse {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A transform group references a name that was never registered
    #[error("Unknown transform '{name}'{}", .group.as_deref().map(|g| format!(" in group '{g}'")).unwrap_or_default())]
    UnknownTransform { name: String, group: Option<String> },

    /// A transform or group name was registered twice without an explicit override
    #[error("{kind} '{name}' is already registered")]
    DuplicateTransform { kind: &'static str, name: String },

    /// A token has no value after all transforms, or a semantic role cannot be resolved
    #[error("Unresolved value for '{path}': {message}")]
    UnresolvedValue { path: String, message: String },

    /// Two distinct token paths produced the same output name
    #[error("Name collision: '{name}' is produced by both '{first}' and '{second}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Light and dark overlays do not cover the same roles, or a required role is missing
    #[error("Theme coverage error in '{theme}': {message}")]
    ThemeCoverage { theme: String, message: String },

    /// A file spec references a format that does not exist
    #[error("Unknown format '{name}'")]
    UnknownFormat { name: String },

    /// Writing an output document failed
    #[error("Failed to write '{}': {source}", .path.display())]
    EmissionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid build configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Failure while building one file of one platform, or while transforming
    /// the tokens shared by all of its files
    #[error("Platform '{platform}' {}: {source}", file_scope(.file))]
    Platform {
        platform: String,
        /// `None` when every file of the platform is affected
        file: Option<String>,
        #[source]
        source: Box<Error>,
    },
}

fn file_scope(file: &Option<String>) -> String {
    match file {
        Some(file) => format!("file '{file}'"),
        None => "(all files)".to_string(),
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a source parse error without an underlying cause
    pub fn source_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SourceParse {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error without an underlying cause
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create an unresolved value error
    pub fn unresolved(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnresolvedValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap this error with the platform and file it occurred in
    pub fn in_platform(self, platform: impl Into<String>, file: impl Into<String>) -> Self {
        Self::Platform {
            platform: platform.into(),
            file: Some(file.into()),
            source: Box::new(self),
        }
    }

    /// Wrap this error with a platform whose files all failed, e.g. because
    /// its transform group could not run
    pub fn in_all_platform_files(self, platform: impl Into<String>) -> Self {
        Self::Platform {
            platform: platform.into(),
            file: None,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping platform context wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Platform { source, .. } => source.root(),
            other => other,
        }
    }

    /// Short machine-readable identifier of the error kind
    pub fn kind(&self) -> &'static str {
        match self.root() {
            Self::SourceParse { .. } => "source_parse",
            Self::UnknownTransform { .. } => "unknown_transform",
            Self::DuplicateTransform { .. } => "duplicate_transform",
            Self::UnresolvedValue { .. } => "unresolved_value",
            Self::NameCollision { .. } => "name_collision",
            Self::ThemeCoverage { .. } => "theme_coverage",
            Self::UnknownFormat { .. } => "unknown_format",
            Self::EmissionWrite { .. } => "emission_write",
            Self::Configuration { .. } => "configuration",
            Self::Platform { .. } => "platform",
        }
    }
}
