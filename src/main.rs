// hybrid-assistant - cloud answers behind local compliance checks
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use hybrid_assistant::cli::{self, Cli, Command};
use hybrid_assistant::config::load_config;

/// Log to stderr. `RUST_LOG` wins; otherwise warnings only, or debug for
/// this crate with `-v`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,hybrid_assistant=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Ask { query, local } => cli::run_ask(&config, &query, &local).await,
        Command::Chat { local } => cli::run_chat(config, &local).await,
        Command::CheckModel { local } => cli::run_check_model(&config, &local).await,
        Command::Audit { last } => cli::run_audit(&config, last),
        Command::Serve { bind } => cli::run_serve(&config, bind).await,
    }
}
