// Terminal rendering of pipeline results

use crossterm::style::Stylize;
use std::io::{self, Write};

use crate::audit::AuditRecord;
use crate::pipeline::{Outcome, Review, Run, SoftStop};

pub fn render_soft_stop(stop: &SoftStop, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", format!("⚠️  {}", stop).yellow())?;
    if let SoftStop::ModelNotInstalled { remediation, .. } = stop {
        writeln!(out, "    {}", remediation.as_str().bold())?;
    }
    Ok(())
}

fn render_precheck(review: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "📝 Local Model Review:".cyan())?;
    writeln!(out)?;
    writeln!(out, "{}", review)?;
    writeln!(out)
}

pub fn render_run(run: &Run, out: &mut impl Write) -> io::Result<()> {
    let model = run.model.as_deref().unwrap_or("local");

    match &run.outcome {
        Outcome::Stopped { reason, .. } => render_soft_stop(reason, out)?,
        Outcome::Rejected { review } => {
            render_precheck(review, out)?;
            writeln!(
                out,
                "{}",
                "🚫 Local model flagged this prompt as unsafe for cloud.".red()
            )?;
        }
        Outcome::Failed {
            stage,
            error,
            precheck_review,
        } => {
            if let Some(review) = precheck_review {
                render_precheck(review, out)?;
            }
            writeln!(out, "{}", format!("✗ {} failed: {}", stage.as_str(), error).red())?;
        }
        Outcome::Completed(completion) => {
            render_precheck(&completion.precheck_review, out)?;

            writeln!(out, "{}", "🌐 Cloud Response".bold())?;
            writeln!(out, "{}", completion.cloud_response)?;
            writeln!(out)?;

            writeln!(out, "{}", format!("🛡️  Local Model Review ({})", model).bold())?;
            match &completion.review {
                Review::Verdict(text) => writeln!(out, "{}", text)?,
                Review::Unavailable(error) => writeln!(
                    out,
                    "{}",
                    format!("(review unavailable: {})", error).dark_yellow()
                )?,
            }
        }
    }

    Ok(())
}

pub fn render_record(record: &AuditRecord, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string().dark_grey()
    )?;
    writeln!(out, "  {} {}", "input:".bold(), record.input)?;
    writeln!(out, "  {} {}", "cloud:".bold(), record.cloud_response)?;
    if let Some(error) = &record.review_error {
        writeln!(out, "  {} (unavailable: {})", "review:".bold(), error)?;
    } else {
        writeln!(out, "  {} {}", "review:".bold(), record.local_validation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Completion, FailedStage, SessionState};
    use uuid::Uuid;

    fn run_with(outcome: Outcome) -> Run {
        Run {
            id: Uuid::new_v4(),
            model: Some("mistral".to_string()),
            outcome,
            path: vec![SessionState::Idle],
        }
    }

    fn rendered(run: &Run) -> String {
        let mut buf = Vec::new();
        render_run(run, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_rejected() {
        let text = rendered(&run_with(Outcome::Rejected {
            review: "NO - contains a name".to_string(),
        }));
        assert!(text.contains("NO - contains a name"));
        assert!(text.contains("unsafe for cloud"));
    }

    #[test]
    fn test_render_completed() {
        let record = AuditRecord::new("q", "The answer.", "Looks accurate.");
        let text = rendered(&run_with(Outcome::Completed(Completion {
            precheck_review: "YES".to_string(),
            cloud_response: "The answer.".to_string(),
            review: Review::Verdict("Looks accurate.".to_string()),
            record,
        })));
        assert!(text.contains("Cloud Response"));
        assert!(text.contains("The answer."));
        assert!(text.contains("Local Model Review (mistral)"));
        assert!(text.contains("Looks accurate."));
    }

    #[test]
    fn test_render_failed_and_stopped() {
        let text = rendered(&run_with(Outcome::Failed {
            stage: FailedStage::Precheck,
            error: "connection refused".to_string(),
            precheck_review: None,
        }));
        assert!(text.contains("local pre-check failed: connection refused"));

        let text = rendered(&run_with(Outcome::stopped(SoftStop::model_not_installed(
            "phi3",
        ))));
        assert!(text.contains("not installed"));
        assert!(text.contains("ollama pull phi3"));
    }
}
