//! Build command handler

use super::utils::{create_builder, plural};
use crate::cli::BuildArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use dyntokens_core::build::commit;
use tracing::info;

/// Handle the build command
///
/// The whole build is staged in memory first; `--clean` only removes the
/// previous outputs once staging has succeeded.
pub fn handle_build(args: BuildArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::new("build");
    let builder = create_builder(config, &args.project)?;

    output.info(&format!("Building tokens in {}", builder.config().root.display()))?;

    let spinner = output.spinner("Building platforms...");
    let result = timer.span().in_scope(|| builder.stage_all_platforms());
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let staged = result?;

    if args.clean {
        let removed = builder.clean_all_platforms()?;
        output.info(&format!(
            "Removed {} existing output file{}",
            removed.len(),
            plural(removed.len())
        ))?;
    }

    commit(&staged.files)?;
    let report = staged.report(true);

    info!(
        files = report.files.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Build finished"
    );

    output.build_report(&report)?;
    for theme in report.themes.iter().filter(|t| !t.fallbacks.is_empty()) {
        output.warning(&format!(
            "Theme '{}' used fallback values for {} role{}",
            theme.name,
            theme.fallbacks.len(),
            plural(theme.fallbacks.len())
        ))?;
    }
    output.success(&format!(
        "✓ Built {} file{} in {:.2?}",
        report.files.len(),
        plural(report.files.len()),
        timer.elapsed()
    ))?;

    Ok(())
}
