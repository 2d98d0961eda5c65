//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs, OutputFormat};
use crate::config::{Config, LoadedConfig};
use crate::error::{Error, Result};
use crate::output::OutputWriter;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, loaded: &LoadedConfig, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, &loaded.config, output),
        ConfigAction::Path => handle_config_path(loaded, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            args.path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&args.path)?;
    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    output.info("Edit it to point the build at your token sources and outputs.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = render(config, args.format)?;
    output.write(&content)
}

/// Handle config path subcommand
fn handle_config_path(loaded: &LoadedConfig, output: &mut OutputWriter) -> Result<()> {
    if output.format() != OutputFormat::Human {
        return output.data(&serde_json::json!({ "path": loaded.path }));
    }
    match &loaded.path {
        Some(path) => output.writeln(&path.display().to_string()),
        None => {
            output.info("No configuration file found; using built-in defaults")?;
            output.info(&format!(
                "Searched: {}",
                Config::default_config_paths()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }
    }
}

fn render(config: &Config, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Yaml => Ok(serde_yaml::to_string(config)?),
        ConfigFormat::Json => Ok(serde_json::to_string_pretty(config)? + "\n"),
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e))),
    }
}
