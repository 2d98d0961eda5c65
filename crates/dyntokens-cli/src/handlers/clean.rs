//! Clean command handler

use super::utils::{create_builder, plural};
use crate::cli::{CleanArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;

/// Handle the clean command
pub fn handle_clean(args: CleanArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let builder = create_builder(config, &args.project)?;
    let removed = builder.clean_all_platforms()?;

    if output.format() != OutputFormat::Human {
        return output.data(&removed);
    }

    for path in &removed {
        output.info(&format!("Removed {}", path.display()))?;
    }
    output.success(&format!(
        "✓ Removed {} file{}",
        removed.len(),
        plural(removed.len())
    ))?;

    Ok(())
}
