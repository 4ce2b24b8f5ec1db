//! Agent commands

use anyhow::Result;
use clap::Subcommand;

use crate::api::{ApiClient, OperationKind, Submission};
use crate::cli::output::{OutputFormat, print_progress};

use super::{print_payload, resolve_input};

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Ask the writer agent to draft text
    Write {
        /// Prompt for the writer ("-" reads stdin)
        prompt: String,
    },

    /// Ask the reviewer agent to critique text
    Review {
        /// Text to review ("-" reads stdin)
        text: String,
    },

    /// Ask the designer agent for layout ideas
    Design {
        /// Design context ("-" reads stdin)
        context: String,
    },
}

pub async fn run(
    command: AgentCommands,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let (kind, input) = match command {
        AgentCommands::Write { prompt } => (OperationKind::Write, prompt),
        AgentCommands::Review { text } => (OperationKind::Review, text),
        AgentCommands::Design { context } => (OperationKind::Design, context),
    };

    submit_text(kind, &input, client, format, quiet).await
}

pub async fn run_workflow(
    prompt: &str,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    submit_text(OperationKind::Workflow, prompt, client, format, quiet).await
}

async fn submit_text(
    kind: OperationKind,
    input: &str,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let text = resolve_input(input).await?;
    let submission = Submission::agent(kind, &text)?;

    print_progress(&format!("Running {}...", kind), format, quiet);
    let payload = client.submit(&submission).await?;
    print_payload(&payload, client.base_url(), format);

    Ok(())
}
