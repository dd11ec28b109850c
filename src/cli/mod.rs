// CLI module
// Public interface for command-line interface

pub mod args;
mod commands;
pub mod render;
mod repl;
mod run;

pub use args::{Cli, Command, LocalArgs};
pub use repl::ChatSession;
pub use run::{build_pipeline, run_ask, run_audit, run_chat, run_check_model, run_serve};
