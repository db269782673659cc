//! pccat-admin - PC component catalog administration
//!
//! Logs go to stderr; command output goes to stdout.

use clap::Parser;
use pccat_admin::{exit_code, render_error, run, Cli};
use pccat_common::config::TomlConfig;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is loaded before logging so the file can set the level
    let config = TomlConfig::load(cli.config.as_deref());
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting PC Catalog Admin (pccat-admin) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Command: {:?}", cli.command);

    let mut stdout = std::io::stdout().lock();
    match run(&cli, &config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::from(exit_code(&err))
        }
    }
}
