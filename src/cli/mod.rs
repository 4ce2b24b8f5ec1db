//! CLI module for Scribe
//!
//! Provides command-line access to every backend operation, plus an
//! interactive shell. Running without a subcommand opens the window.

mod commands;
mod output;
mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use output::{OutputFormat, print_error};

use crate::api::ApiClient;
use crate::config::Config;

/// Scribe - Book Writer AI client
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    /// Backend base URL (overrides SCRIBE_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Omit to open the window
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single agent (writer, reviewer, designer)
    Agent {
        #[command(subcommand)]
        command: commands::agent::AgentCommands,
    },

    /// Run the full writer/reviewer/designer workflow
    Workflow {
        /// Prompt for the workflow ("-" reads stdin)
        prompt: String,
    },

    /// Book generation
    Book {
        #[command(subcommand)]
        command: commands::book::BookCommands,
    },

    /// Show the active configuration
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },

    /// Diagnostics
    Diag {
        #[command(subcommand)]
        command: commands::diag::DiagCommands,
    },

    /// Start an interactive shell
    Shell,
}

/// Run the CLI with parsed arguments
pub async fn run(command: Commands, options: &OutputOptions, config: &Config) -> Result<()> {
    if matches!(command, Commands::Shell) {
        return shell::run(config).await;
    }

    let client = ApiClient::new(&config.backend)?;
    dispatch(command, config, &client, options.format(), options.quiet).await
}

/// Dispatch a non-shell command to its handler
async fn dispatch(
    command: Commands,
    config: &Config,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        Commands::Agent { command } => commands::agent::run(command, client, format, quiet).await,
        Commands::Workflow { prompt } => {
            commands::agent::run_workflow(&prompt, client, format, quiet).await
        }
        Commands::Book { command } => commands::book::run(command, client, format, quiet).await,
        Commands::Config { command } => commands::config::run(command, config, format),
        Commands::Diag { command } => commands::diag::run(command, client, format).await,
        Commands::Shell => anyhow::bail!("Already in shell mode."),
    }
}
