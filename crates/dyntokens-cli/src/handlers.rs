//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod build;
mod check;
mod clean;
mod completions;
mod config;
mod transforms;
mod utils;

pub use build::handle_build;
pub use check::handle_check;
pub use clean::handle_clean;
pub use completions::handle_completions;
pub use config::handle_config;
pub use transforms::handle_transforms;
