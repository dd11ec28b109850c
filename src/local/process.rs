// Subprocess transport - pipes the prompt into `<program> run <model>`

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{LocalModel, LocalTarget};
use crate::config::TransportKind;
use crate::errors::LocalModelError;

/// Local model reached by spawning the runner binary once per call
#[derive(Debug, Clone)]
pub struct ProcessModel {
    program: String,
    timeout: Option<Duration>,
}

impl ProcessModel {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the program with `args`, optionally feeding `input` on stdin,
    /// and return trimmed stdout.
    async fn run(&self, args: &[&str], input: Option<&str>) -> Result<String, LocalModelError> {
        tracing::debug!("Running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LocalModelError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from its own task so a chatty child can't fill stdout
        // while we are still writing.
        let writer = match (input, child.stdin.take()) {
            (Some(text), Some(mut stdin)) => {
                let bytes = text.as_bytes().to_vec();
                Some(tokio::spawn(async move {
                    stdin.write_all(&bytes).await?;
                    stdin.shutdown().await
                }))
            }
            _ => None,
        };

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| LocalModelError::Timeout(limit.as_secs()))?,
            None => child.wait_with_output().await,
        }
        .map_err(|source| LocalModelError::Io {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(LocalModelError::ExitStatus {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Some(writer) = writer {
            let written = writer
                .await
                .unwrap_or_else(|join_err| Err(std::io::Error::other(join_err)));
            match written {
                // The child exited cleanly without draining stdin
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(source) => {
                    return Err(LocalModelError::Io {
                        program: self.program.clone(),
                        source,
                    })
                }
                Ok(()) => {}
            }
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl LocalModel for ProcessModel {
    async fn generate(&self, target: &LocalTarget, prompt: &str) -> Result<String, LocalModelError> {
        self.run(&["run", &target.model], Some(prompt)).await
    }

    async fn installed_models(&self, _target: &LocalTarget) -> Result<String, LocalModelError> {
        self.run(&["list"], None).await
    }

    fn transport(&self) -> TransportKind {
        TransportKind::Process
    }
}
