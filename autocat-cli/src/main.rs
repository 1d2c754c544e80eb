//! Autocat command-line shell.
//!
//! Parses arguments, loads configuration and hands the run to the scanner.
//! All catalog logic lives in the `crates/` directory.

mod cli;

use anyhow::Context as _;
use autocat_browser::EngineLauncher;
use autocat_core::AppConfig;
use autocat_scanner::{write_empty, RunController, RunOutput};
use clap::Parser as _;
use std::process::ExitCode;
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,autocat=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    info!("Starting autocat v{}", env!("CARGO_PKG_VERSION"));

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            if let Err(write_err) = write_empty(&cli.output) {
                tracing::error!("Could not write empty result: {}", write_err);
            }
            return Err(e);
        }
    };

    let request = cli.request(&config);
    let controller = RunController::new(EngineLauncher::new(config.browser.clone()), &config);

    let output = controller
        .execute(&request, &cli.output)
        .await
        .with_context(|| format!("{} run", request.mode))?;

    if let RunOutput::Catalog(report) = &output {
        if report.catalog.is_empty() {
            tracing::warn!("No brands were collected");
        }
        if !report.is_complete() {
            tracing::warn!(
                "{} branches could not be fetched and were left empty",
                report.failures.len()
            );
        }
    }

    info!("Done");
    Ok(())
}

/// Config file (explicit or default location), then env, then flags.
fn load_config(cli: &cli::Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => AppConfig::load().context("load config")?,
    };
    config.apply_env_overrides();
    cli.apply(&mut config);
    config.validate().context("validate config")?;
    Ok(config)
}
