mod api;
mod app;
mod cli;
mod config;
mod download;
mod outcome;
mod state;
mod task;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ApiClient;
use crate::cli::Cli;
use crate::config::Config;

/// Default log filter: chatty for the window, quiet for terminal commands
fn default_filter(cli: &Cli) -> &'static str {
    if cli.command.is_none() || cli.output.verbose {
        "scribe=debug,info"
    } else {
        "scribe=warn"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so CLI output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(&cli).into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match Config::load(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            cli::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    };

    match cli.command {
        Some(command) => {
            if let Err(e) = cli::run(command, &cli.output, &config).await {
                cli::print_error(&format!("{:#}", e));
                std::process::exit(1);
            }
            Ok(())
        }
        None => run_gui(config),
    }
}

/// Open the main window and block until it closes
fn run_gui(config: Config) -> Result<()> {
    tracing::info!("Starting Scribe against {}", config.backend.base_url);

    let client = ApiClient::new(&config.backend)?;

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([760.0, 720.0])
        .with_min_inner_size([520.0, 480.0])
        .with_title("Scribe - Book Writer AI");

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Scribe",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::ScribeApp::new(cc, client)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
