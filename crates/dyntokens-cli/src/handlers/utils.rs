//! Shared utilities for command handlers

use crate::cli::ProjectArgs;
use crate::config::Config;
use crate::error::Result;
use dyntokens_core::{Builder, TransformRegistry};
use tracing::debug;

/// Create a builder for the configured project with command-line overrides
/// applied and the built-in transforms registered
pub fn create_builder(config: &Config, project: &ProjectArgs) -> Result<Builder> {
    let build = config.build_config(project)?;
    debug!(
        root = %build.root.display(),
        sources = ?build.source,
        platforms = build.platforms.len(),
        "Creating builder"
    );
    Ok(Builder::new(build, TransformRegistry::with_builtins()))
}

/// Plural suffix for counts in messages
pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
