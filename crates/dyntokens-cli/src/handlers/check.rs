//! Check command handler
//!
//! Runs the full build in memory so every error a build would raise is
//! reported, without touching the output directories.

use super::utils::{create_builder, plural};
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, ThemeRoles};

/// Handle the check command
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::new("check");
    let builder = create_builder(config, &args.project)?;

    output.info(&format!("Checking tokens in {}", builder.config().root.display()))?;

    let spinner = output.spinner("Checking platforms...");
    let result = timer.span().in_scope(|| builder.stage_all_platforms());
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let staged = result?;

    if args.roles {
        let themes: Vec<ThemeRoles> = staged.themes.iter().map(ThemeRoles::from).collect();
        output.section("Theme roles")?;
        return output.theme_roles(&themes);
    }

    let report = staged.report(false);
    output.build_report(&report)?;
    output.success(&format!(
        "✓ All {} file{} would build",
        report.files.len(),
        plural(report.files.len())
    ))?;

    Ok(())
}
