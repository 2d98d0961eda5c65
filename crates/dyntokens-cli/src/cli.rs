//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// DynTokens - build CSS, JavaScript and JSON design tokens with light and dark themes
///
/// Loads token sources, resolves the semantic theme roles, runs each
/// platform's transform group and writes the configured output files.
#[derive(Parser, Debug)]
#[command(
    name = "dyntokens",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "DYNTOKENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every platform and write the output files
    Build(BuildArgs),

    /// Run the whole build in memory and report problems without writing
    Check(CheckArgs),

    /// List registered transforms, transform groups and output formats
    Transforms(TransformsArgs),

    /// Remove the output files declared by every platform
    Clean(CleanArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Options shared by the commands that run a build
#[derive(Parser, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Project root that sources and outputs are resolved against
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Source glob patterns, replacing the configured ones
    #[arg(short, long = "source", value_name = "GLOB")]
    pub sources: Vec<String>,

    /// Only build the named platforms
    #[arg(short, long = "platform", value_name = "NAME")]
    pub platforms: Vec<String>,
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Remove existing output files before building
    #[arg(long)]
    pub clean: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Show how every semantic role was resolved
    #[arg(long)]
    pub roles: bool,
}

/// Arguments for the transforms command
#[derive(Parser, Debug)]
pub struct TransformsArgs {
    /// Only show the members of this group
    #[arg(short, long, value_name = "GROUP")]
    pub group: Option<String>,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),

    /// Print the configuration file in use
    Path,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// File to create; the extension selects the format
    #[arg(default_value = "dyntokens.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_arguments() {
        let cli = Cli::parse_from([
            "dyntokens",
            "-vv",
            "build",
            "--root",
            "site",
            "-s",
            "design/**/*.json",
            "-p",
            "css",
            "--clean",
        ]);
        assert_eq!(cli.verbosity_level(), 2);
        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.project.root, Some(PathBuf::from("site")));
        assert_eq!(args.project.sources, vec!["design/**/*.json"]);
        assert_eq!(args.project.platforms, vec!["css"]);
        assert!(args.clean);
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Check(CheckArgs {
                project: ProjectArgs::default(),
                roles: false,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_output_and_config_subcommands() {
        let cli = Cli::parse_from(["dyntokens", "-o", "json-pretty", "config", "show", "-f", "toml"]);
        assert_eq!(cli.output, OutputFormat::JsonPretty);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show(ConfigShowArgs {
                    format: ConfigFormat::Toml
                })
            })
        ));
    }
}
