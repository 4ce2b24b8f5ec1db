//! Configuration commands

use anyhow::Result;
use clap::Subcommand;

use crate::cli::output::{OutputFormat, print_formatted};
use crate::config::{API_URL_ENV, Config};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the active configuration
    Show,

    /// Get a specific config value
    Get {
        /// Config key (e.g., "backend.base_url")
        key: String,
    },
}

pub fn run(command: ConfigCommands, config: &Config, format: OutputFormat) -> Result<()> {
    match command {
        ConfigCommands::Show => show(config, format),
        ConfigCommands::Get { key } => get(config, &key, format),
    }
}

fn show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
        OutputFormat::Text => {
            println!("# Backend URL comes from --api-url, then {}", API_URL_ENV);
            println!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}

fn get(config: &Config, key: &str, format: OutputFormat) -> Result<()> {
    let value = get_config_value(config, key)?;
    print_formatted(&value, format, |v| v.clone());
    Ok(())
}

fn get_config_value(config: &Config, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["backend", "base_url"] => Ok(config.backend.base_url.clone()),
        _ => anyhow::bail!("Unknown config key: {}", key),
    }
}
