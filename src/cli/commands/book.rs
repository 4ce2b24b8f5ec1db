//! Book generation commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use tokio::sync::watch;

use crate::api::{ApiClient, BookArtifacts, Submission};
use crate::cli::output::{OutputFormat, format_size, print_progress};
use crate::download::{self, DownloadProgress};

use super::print_payload;

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// Generate a book and print its download links
    Generate {
        /// Book title
        #[arg(long)]
        title: String,

        /// Book topic
        #[arg(long)]
        topic: String,

        /// Also save the DOCX and PDF into this directory
        #[arg(long, value_name = "DIR")]
        download: Option<PathBuf>,
    },
}

pub async fn run(
    command: BookCommands,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    match command {
        BookCommands::Generate {
            title,
            topic,
            download,
        } => generate(&title, &topic, download.as_deref(), client, format, quiet).await,
    }
}

async fn generate(
    title: &str,
    topic: &str,
    download_dir: Option<&Path>,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let submission = Submission::book(title, topic)?;

    print_progress(&format!("Generating \"{}\"...", title), format, quiet);
    let payload = client.submit(&submission).await?;
    print_payload(&payload, client.base_url(), format);

    let Some(dir) = download_dir else {
        return Ok(());
    };

    let artifacts = payload
        .book()
        .context("Backend response did not include book file paths")?;
    save_artifacts(&artifacts, dir, client, format, quiet).await
}

/// Download both generated files into `dir`
async fn save_artifacts(
    artifacts: &BookArtifacts,
    dir: &Path,
    client: &ApiClient,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    for remote in [&artifacts.docx_file, &artifacts.pdf_file] {
        let url = download::artifact_url(client.base_url(), remote)?;
        let dest = dir.join(download::file_name_of(remote));
        let (progress_tx, _progress_rx) = watch::channel(DownloadProgress::default());

        let result = download::download_artifact(client.client().clone(), url, dest, progress_tx)
            .await
            .with_context(|| format!("Failed to save {}", remote))?;

        print_progress(
            &format!(
                "Saved {} ({})",
                result.file_path.display(),
                format_size(result.bytes)
            ),
            format,
            quiet,
        );
    }

    Ok(())
}
