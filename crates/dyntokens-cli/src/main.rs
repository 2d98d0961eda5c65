//! DynTokens CLI - command-line interface for the design token build
//!
//! This is the main entry point for the `dyntokens` binary, providing
//! commands for building, checking and cleaning token outputs and for
//! inspecting the transform registry and configuration.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::{Config, LoadedConfig};
use error::Result;
use logging::timing::Timer;
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    let code = match execute(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            e.exit_code()
        }
    };

    process::exit(code);
}

/// Load configuration, start logging and run the command. The log guard is
/// dropped before returning so buffered log lines reach the file.
fn execute(cli: Cli) -> Result<()> {
    let loaded = Config::load_with_file(cli.config.as_deref())?;

    let _guard = match init_logging(&cli, &loaded.config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    run(cli, loaded)
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, loaded: LoadedConfig) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let config = &loaded.config;
    let use_color = cli.use_color() && config.output.color;
    let mut output = OutputWriter::new(cli.output, use_color, cli.quiet, config.output.progress);

    tracing::info!(
        config = ?loaded.path,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Build(args) => handlers::handle_build(args, config, &mut output),
        Commands::Check(args) => handlers::handle_check(args, config, &mut output),
        Commands::Transforms(args) => handlers::handle_transforms(args, &mut output),
        Commands::Clean(args) => handlers::handle_clean(args, config, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &loaded, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system from the config file section, the `-v`
/// count and the environment, in that order of precedence
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    let mut logging_config = config.logging.clone().with_verbosity(cli.verbosity_level());

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
    }

    logging::init_logging(logging_config)
}
