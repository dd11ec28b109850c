// Results of a submission

use serde::Serialize;
use uuid::Uuid;

use super::state::SessionState;
use super::submission::SoftStop;
use crate::audit::AuditRecord;

/// Which call failed a strict-mode run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedStage {
    Precheck,
    Cloud,
}

impl FailedStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailedStage::Precheck => "local pre-check",
            FailedStage::Cloud => "cloud call",
        }
    }
}

/// The local model's verdict on the cloud answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Review {
    Verdict(String),
    /// The review call failed; holds the error
    Unavailable(String),
}

impl Review {
    /// Text for the audit record's `local_validation` field.
    pub fn verdict_text(&self) -> &str {
        match self {
            Review::Verdict(text) => text,
            Review::Unavailable(_) => "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub precheck_review: String,
    pub cloud_response: String,
    pub review: Review,
    pub record: AuditRecord,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Halted before any call
    Stopped { reason: SoftStop, message: String },
    /// The compliance gate flagged the query
    Rejected { review: String },
    /// A call failed (strict failure mode)
    Failed {
        stage: FailedStage,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        precheck_review: Option<String>,
    },
    Completed(Completion),
}

impl Outcome {
    pub fn stopped(reason: SoftStop) -> Self {
        let message = reason.to_string();
        Outcome::Stopped { reason, message }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}

/// One processed submission
#[derive(Debug, Clone, Serialize)]
pub struct Run {
    pub id: Uuid,
    /// Resolved local model, when resolution got that far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub outcome: Outcome,
    pub path: Vec<SessionState>,
}

impl Run {
    pub fn final_state(&self) -> SessionState {
        self.path.last().copied().unwrap_or(SessionState::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(Outcome::stopped(SoftStop::MissingModel)).unwrap();
        assert_eq!(json["status"], "stopped");
        assert_eq!(json["reason"]["kind"], "missing_model");
        assert!(json["message"].as_str().unwrap().contains("custom model name"));

        let json = serde_json::to_value(Outcome::Rejected {
            review: "NO".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "rejected", "review": "NO"}));

        let json = serde_json::to_value(Outcome::Failed {
            stage: FailedStage::Cloud,
            error: "HTTP 500".to_string(),
            precheck_review: None,
        })
        .unwrap();
        assert_eq!(json["stage"], "cloud");
        assert!(json.get("precheck_review").is_none());
    }

    #[test]
    fn test_review_text() {
        assert_eq!(Review::Verdict("Accurate".into()).verdict_text(), "Accurate");
        assert_eq!(Review::Unavailable("timeout".into()).verdict_text(), "");

        let json = serde_json::to_value(Review::Unavailable("timeout".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "unavailable", "text": "timeout"}));
    }
}
