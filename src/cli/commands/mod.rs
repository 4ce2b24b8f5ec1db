//! CLI command implementations

pub mod agent;
pub mod book;
pub mod config;
pub mod diag;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::api::SuccessPayload;
use crate::cli::output::{OutputFormat, print_formatted};
use crate::outcome::{Outcome, ResultView};

/// Resolve a text argument, reading stdin when it is "-"
async fn resolve_input(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read input from stdin")?;
    Ok(text)
}

/// Print a successful response: raw body for JSON, rendered view for text
fn print_payload(payload: &SuccessPayload, base_url: &str, format: OutputFormat) {
    let view = ResultView::new(&Outcome::Success(payload.clone()), base_url);
    print_formatted(&payload.body, format, |_| view.text());
}
