// Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::ModelChoice;

/// Ask a cloud LLM, with a local model checking what goes out and what comes back
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config.toml (default: ~/.hybrid-assistant/config.toml)
    #[arg(long, global = true, env = "HYBRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one question through the pipeline
    Ask {
        /// The question to send
        query: String,

        #[command(flatten)]
        local: LocalArgs,
    },

    /// Interactive session; one question per line
    Chat {
        #[command(flatten)]
        local: LocalArgs,
    },

    /// Only check that the local model is installed
    CheckModel {
        #[command(flatten)]
        local: LocalArgs,
    },

    /// Show recent audit records
    Audit {
        /// Number of records to show
        #[arg(long, default_value_t = 10)]
        last: usize,
    },

    /// Serve the pipeline as a JSON API
    Serve {
        /// Bind address (default from config, 127.0.0.1:8000)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Local model selection shared by several subcommands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LocalArgs {
    /// Local model for the checks: a preset, any installed name, or "custom"
    #[arg(short, long)]
    pub model: Option<String>,

    /// Model name to use with `--model custom`
    #[arg(long)]
    pub custom_model: Option<String>,

    /// Local model server URL (http transport)
    #[arg(long)]
    pub base_url: Option<String>,
}

impl LocalArgs {
    pub fn model_choice(&self, default_model: &str) -> ModelChoice {
        ModelChoice::from_selector(
            self.model.as_deref().unwrap_or(default_model),
            self.custom_model.as_deref(),
        )
    }
}
