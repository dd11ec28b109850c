// Interactive chat session

use anyhow::Result;
use crossterm::{style::Stylize, terminal};
use std::io::{self, BufRead, IsTerminal, Write};

use crate::config::Config;
use crate::local::LocalTarget;
use crate::pipeline::{ModelChoice, Pipeline, Submission};

use super::commands::{format_help, format_status, Command};
use super::render::{render_run, render_soft_stop};

/// Get current terminal width, or default to 80 if not a TTY
fn terminal_width() -> usize {
    terminal::size().map(|(w, _)| w as usize).unwrap_or(80)
}

pub struct ChatSession {
    config: Config,
    pipeline: Pipeline,
    base_url: Option<String>,
    /// Set once the selected model passed the availability check
    target: Option<LocalTarget>,
    is_interactive: bool,
}

impl ChatSession {
    pub fn new(config: Config, pipeline: Pipeline, base_url: Option<String>) -> Self {
        // Detect if we're in interactive mode (stdout is a TTY)
        let is_interactive = io::stdout().is_terminal();

        Self {
            config,
            pipeline,
            base_url,
            target: None,
            is_interactive,
        }
    }

    /// Resolve and check `choice`; on failure the session keeps running but
    /// refuses questions until `/model` picks a usable model.
    async fn select_model(&mut self, choice: &ModelChoice) -> Result<()> {
        match self
            .pipeline
            .ensure_ready(choice, self.base_url.as_deref())
            .await
        {
            Ok(target) => {
                if self.is_interactive {
                    println!("{}", format!("✓ Local model: {}", target.model).green());
                }
                self.target = Some(target);
            }
            Err(stop) => {
                self.target = None;
                render_soft_stop(&stop, &mut io::stdout())?;
            }
        }
        Ok(())
    }

    pub async fn run(&mut self, initial: ModelChoice) -> Result<()> {
        if self.is_interactive {
            println!("Hybrid LLM Assistant");
            println!("Prompts are reviewed by a local model before being sent to the cloud.");
            println!();
        } else {
            // Minimal output for non-interactive mode (pipes, scripts)
            eprintln!("# hybrid-assistant - non-interactive mode");
        }

        self.select_model(&initial).await?;

        if self.is_interactive {
            println!("Ready. Type /help for commands.");
        }

        let stdin = io::stdin();
        loop {
            if self.is_interactive {
                println!();
                self.print_separator();
                print!("💬 ");
            }
            io::stdout().flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                break; // EOF
            }
            let input = input.trim_end_matches(['\r', '\n']);

            if let Some(command) = Command::parse(input) {
                match command {
                    Command::Quit => {
                        if self.is_interactive {
                            println!("Goodbye!");
                        }
                        break;
                    }
                    Command::Help => println!("{}", format_help(&self.config)),
                    Command::Status => println!(
                        "{}",
                        format_status(&self.pipeline, self.target.as_ref().map(|t| t.model.as_str()))
                    ),
                    Command::Model(arg) => {
                        let choice = match arg.split_once(char::is_whitespace) {
                            Some((head, name)) => ModelChoice::from_selector(head, Some(name.trim())),
                            None => ModelChoice::from_selector(&arg, None),
                        };
                        self.select_model(&choice).await?;
                    }
                }
                continue;
            }

            self.process_query(input).await?;
        }

        Ok(())
    }

    /// Print separator line that adapts to terminal width
    fn print_separator(&self) {
        let width = terminal_width();
        println!("{}", "─".repeat(width).dark_grey());
    }

    async fn process_query(&mut self, query: &str) -> Result<()> {
        let Some(target) = self.target.clone() else {
            println!(
                "{}",
                "⚠️  No usable local model. Pick one with /model <name>.".yellow()
            );
            return Ok(());
        };

        if self.is_interactive && !query.trim().is_empty() {
            print!("{}", "Checking with local model...".dark_grey());
            io::stdout().flush()?;
        }

        let submission = Submission::new(query, ModelChoice::Named(target.model.clone()))
            .with_base_url(target.base_url.clone());
        let run = self.pipeline.submit(&submission).await;

        if self.is_interactive {
            print!("\r{}\r", " ".repeat(terminal_width()));
        }

        match run {
            Ok(run) => render_run(&run, &mut io::stdout())?,
            Err(e) => eprintln!("{}", format!("Error: {:#}", e).red()),
        }

        Ok(())
    }
}
