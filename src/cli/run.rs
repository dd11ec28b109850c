// Subcommand entry points

use anyhow::Result;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::cloud::OpenAiClient;
use crate::config::Config;
use crate::local::create_local_model;
use crate::pipeline::{check_model_available, resolve_target, Outcome, Pipeline, Submission};
use crate::server::AppServer;

use super::args::LocalArgs;
use super::render::{render_record, render_run, render_soft_stop};
use super::repl::ChatSession;

/// Construct the cloud client from config and wire the pipeline around it.
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let cloud = Arc::new(OpenAiClient::from_config(&config.cloud)?);
    Pipeline::from_config(config, cloud)
}

/// Exit codes: 0 completed, 1 a call failed, 2 stopped, 3 rejected.
fn exit_code(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed(_) => ExitCode::SUCCESS,
        Outcome::Failed { .. } => ExitCode::from(1),
        Outcome::Stopped { .. } => ExitCode::from(2),
        Outcome::Rejected { .. } => ExitCode::from(3),
    }
}

pub async fn run_ask(config: &Config, query: &str, local: &LocalArgs) -> Result<ExitCode> {
    let pipeline = build_pipeline(config)?;
    let submission = Submission::new(query, local.model_choice(&config.local.model))
        .with_base_url(local.base_url.clone());

    let run = pipeline.submit_checked(&submission).await?;
    render_run(&run, &mut io::stdout())?;
    Ok(exit_code(&run.outcome))
}

pub async fn run_chat(config: Config, local: &LocalArgs) -> Result<ExitCode> {
    let pipeline = build_pipeline(&config)?;
    let initial = local.model_choice(&config.local.model);
    let mut session = ChatSession::new(config, pipeline, local.base_url.clone());
    session.run(initial).await?;
    Ok(ExitCode::SUCCESS)
}

/// Availability check only; needs no cloud credentials.
pub async fn run_check_model(config: &Config, local: &LocalArgs) -> Result<ExitCode> {
    let model = create_local_model(&config.local)?;
    let choice = local.model_choice(&config.local.model);

    let checked = match resolve_target(model.as_ref(), &choice, local.base_url.as_deref()) {
        Ok(target) => check_model_available(model.as_ref(), &target)
            .await
            .map(|_| target),
        Err(stop) => Err(stop),
    };

    match checked {
        Ok(target) => {
            println!("✓ Model '{}' is installed", target.model);
            Ok(ExitCode::SUCCESS)
        }
        Err(stop) => {
            render_soft_stop(&stop, &mut io::stdout())?;
            Ok(ExitCode::from(2))
        }
    }
}

pub fn run_audit(config: &Config, last: usize) -> Result<ExitCode> {
    let logger = AuditLogger::new(config.audit_log.clone())?;
    let records = logger.tail(last)?;

    if records.is_empty() {
        println!("No audit records in {}", logger.path().display());
    }
    let mut out = io::stdout();
    for record in &records {
        render_record(record, &mut out)?;
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn run_serve(config: &Config, bind: Option<String>) -> Result<ExitCode> {
    let pipeline = build_pipeline(config)?;
    let bind_address = bind.unwrap_or_else(|| config.server.bind_address.clone());
    AppServer::new(pipeline, config.local.model.clone(), bind_address)
        .serve()
        .await?;
    Ok(ExitCode::SUCCESS)
}
