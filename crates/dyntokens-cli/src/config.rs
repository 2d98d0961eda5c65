//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values (the DynUI-Max layout)
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments

use crate::cli::ProjectArgs;
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use dyntokens_core::BuildConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local file names, checked in order before the user config
const PROJECT_CONFIG_FILES: &[&str] = &[
    "dyntokens.yaml",
    "dyntokens.yml",
    "dyntokens.json",
    "dyntokens.toml",
    ".dyntokens.yaml",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sources, themes and platforms of the build
    pub build: BuildConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output when the terminal supports it
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

/// File format of a configuration file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "a .yaml, .yml, .json or .toml file".to_string(),
            }),
        }
    }
}

/// A configuration together with the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    /// `None` when no file was found and defaults are in use
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    ///
    /// A relative build root is resolved against the directory holding the
    /// file, so a project can be built from anywhere.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, FileFormat::from_path(path)?)?;

        if config.build.root.is_relative() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                config.build.root = parent.join(&config.build.root);
            }
        }
        Ok(config)
    }

    fn parse(content: &str, format: FileFormat) -> Result<Self> {
        Ok(match format {
            FileFormat::Yaml => serde_yaml::from_str(content)?,
            FileFormat::Json => serde_json::from_str(content)?,
            FileFormat::Toml => toml::from_str(content)?,
        })
    }

    /// Load configuration from a specific file or the default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<LoadedConfig> {
        let path = match file {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_config_paths().into_iter().find(|p| p.is_file()),
        };

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                Ok(LoadedConfig {
                    config: Self::from_file(&path)?,
                    path: Some(path),
                })
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(LoadedConfig {
                    config: Self::default(),
                    path: None,
                })
            }
        }
    }

    /// Default configuration file paths to check, in order
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = PROJECT_CONFIG_FILES.iter().map(PathBuf::from).collect();

        if let Some(path) = Self::user_config_path() {
            paths.push(path);
        }

        paths
    }

    /// `<config dir>/dyntokens/config.yaml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dyntokens").join("config.yaml"))
    }

    /// Serialize in the format selected by the file extension
    pub fn to_string_for(&self, path: &Path) -> Result<String> {
        match FileFormat::from_path(path)? {
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_for(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build configuration with command-line overrides applied
    pub fn build_config(&self, args: &ProjectArgs) -> Result<BuildConfig> {
        let mut build = self.build.clone();

        if let Some(root) = &args.root {
            build.root = root.clone();
        }
        if !args.sources.is_empty() {
            build.source = args.sources.clone();
        }
        if !args.platforms.is_empty() {
            if let Some(unknown) = args
                .platforms
                .iter()
                .find(|name| !build.platforms.contains_key(name.as_str()))
            {
                return Err(Error::invalid_args(format!(
                    "unknown platform '{}'; configured platforms: {}",
                    unknown,
                    build.platforms.keys().cloned().collect::<Vec<_>>().join(", ")
                )));
            }
            build.platforms.retain(|name, _| args.platforms.contains(name));
        }

        Ok(build)
    }
}
