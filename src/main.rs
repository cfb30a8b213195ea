//! wdbc-api - Main Entry Point
//!
//! Training job, prediction API and smoke-test client for the Breast
//! Cancer Wisconsin classifier.

use clap::Parser;
use wdbc_api::cli::{Cli, Commands, cmd_interactive, cmd_serve, cmd_smoke, cmd_train};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // One log file per command, matching the logs/ layout of the service.
    let log_file = match &cli.command {
        Some(Commands::Train { .. }) => "training_breast_cancer.log",
        Some(Commands::Serve { .. }) => "app_breast_cancer.log",
        Some(Commands::Smoke { .. }) => "test_app_breast_cancer.log",
        None => "main_breast_cancer.log",
    };
    let _guard = wdbc_api::logging::init(log_file)?;

    match cli.command {
        Some(Commands::Train { data_dir, output }) => {
            cmd_train(&data_dir, output.as_deref()).await?;
        }
        Some(Commands::Serve { host, port, lazy }) => {
            cmd_serve(&host, port, lazy).await?;
        }
        Some(Commands::Smoke { base_url }) => {
            cmd_smoke(&base_url).await?;
        }
        None => {
            // Default: interactive launcher (matches the original's stdin prompt)
            cmd_interactive().await?;
        }
    }

    Ok(())
}
