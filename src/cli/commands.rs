// Slash command handling for the chat session

use crate::config::Config;
use crate::pipeline::Pipeline;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Switch local model (`/model custom <name>` also works)
    Model(String),
    Status,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (head, rest) = match input.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (input, ""),
        };

        match head {
            "/help" => Some(Command::Help),
            "/quit" | "/exit" => Some(Command::Quit),
            "/model" => Some(Command::Model(rest.to_string())),
            "/status" => Some(Command::Status),
            _ => None,
        }
    }
}

pub fn format_help(config: &Config) -> String {
    format!(
        r#"Available commands:
  /help            - Show this help message
  /model <name>    - Switch local model ({}, or "custom <name>")
  /status          - Show model, transport, policy and failure mode
  /quit            - Exit

Type any question to send it through the compliance checks."#,
        config.local.models.join(", ")
    )
}

pub fn format_status(pipeline: &Pipeline, model: Option<&str>) -> String {
    format!(
        "Local model: {}\n\
         Transport: {}\n\
         Cloud: {} ({})\n\
         Gate policy: {}\n\
         Failure mode: {}\n\
         Audit log: {}",
        model.unwrap_or("(not ready)"),
        pipeline.local().transport().as_str(),
        pipeline.cloud().name(),
        pipeline.cloud().model(),
        pipeline.policy_name(),
        pipeline.failure_mode().as_str(),
        pipeline.audit().path().display()
    )
}
