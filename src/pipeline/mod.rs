// Hybrid pipeline: local pre-check -> cloud answer -> local review -> audit
//
// Each submission runs the stages strictly in order. A gate rejection ends
// the run before anything leaves the machine.

use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

use crate::audit::{AuditLogger, AuditRecord};
use crate::cloud::CloudResponder;
use crate::compliance::{create_policy, review_prompt, CompliancePolicy, GateDecision};
use crate::config::{Config, FailureMode};
use crate::local::{create_local_model, listing_contains, LocalModel, LocalTarget};

pub mod outcome;
pub mod state;
pub mod submission;

pub use outcome::{Completion, FailedStage, Outcome, Review, Run};
pub use state::{SessionState, StateTracker};
pub use submission::{ModelChoice, SoftStop, Submission};

pub struct Pipeline {
    local: Arc<dyn LocalModel>,
    cloud: Arc<dyn CloudResponder>,
    policy: Arc<dyn CompliancePolicy>,
    audit: AuditLogger,
    failure_mode: FailureMode,
    check_availability: bool,
}

impl Pipeline {
    /// Strict failure mode with the availability check on.
    pub fn new(
        local: Arc<dyn LocalModel>,
        cloud: Arc<dyn CloudResponder>,
        policy: Arc<dyn CompliancePolicy>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            local,
            cloud,
            policy,
            audit,
            failure_mode: FailureMode::Strict,
            check_availability: true,
        }
    }

    /// Wire up the configured local transport, policy and audit log around
    /// an already constructed cloud client.
    pub fn from_config(config: &Config, cloud: Arc<dyn CloudResponder>) -> Result<Self> {
        let local = create_local_model(&config.local)?;
        let audit = AuditLogger::new(config.audit_log.clone())?;

        Ok(Self::new(local, cloud, create_policy(config.policy), audit)
            .with_failure_mode(config.failure_mode)
            .with_availability_check(config.local.check_availability))
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn with_availability_check(mut self, enabled: bool) -> Self {
        self.check_availability = enabled;
        self
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn local(&self) -> &Arc<dyn LocalModel> {
        &self.local
    }

    pub fn cloud(&self) -> &Arc<dyn CloudResponder> {
        &self.cloud
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Turn a model choice and optional base URL into a call target.
    pub fn resolve_target(
        &self,
        model: &ModelChoice,
        base_url: Option<&str>,
    ) -> Result<LocalTarget, SoftStop> {
        resolve_target(self.local.as_ref(), model, base_url)
    }

    /// Check that the target model is installed.
    ///
    /// A no-op when the check is disabled in config.
    pub async fn check_model(&self, target: &LocalTarget) -> Result<(), SoftStop> {
        if !self.check_availability {
            return Ok(());
        }
        check_model_available(self.local.as_ref(), target).await
    }

    /// Resolve the target and run the availability check.
    pub async fn ensure_ready(
        &self,
        model: &ModelChoice,
        base_url: Option<&str>,
    ) -> Result<LocalTarget, SoftStop> {
        let target = self.resolve_target(model, base_url)?;
        self.check_model(&target).await?;
        Ok(target)
    }

    /// Run one submission through every stage.
    ///
    /// Only an audit log write failure is returned as `Err`; everything
    /// else is reported in the [`Run`]. The availability check is left to
    /// the caller (see [`ensure_ready`](Self::ensure_ready)).
    pub async fn submit(&self, submission: &Submission) -> Result<Run> {
        self.run(submission, false).await
    }

    /// [`submit`](Self::submit) with the availability check folded in,
    /// after the query and target have been validated.
    pub async fn submit_checked(&self, submission: &Submission) -> Result<Run> {
        self.run(submission, true).await
    }

    async fn run(&self, submission: &Submission, check_model: bool) -> Result<Run> {
        let id = Uuid::new_v4();
        let mut tracker = StateTracker::new();
        tracker.advance(SessionState::Submitted);

        let stopped = |mut tracker: StateTracker, stop: SoftStop, model: Option<String>| {
            tracing::warn!("Submission {} stopped: {}", id, stop);
            tracker.advance(SessionState::Stopped);
            Run {
                id,
                model,
                outcome: Outcome::stopped(stop),
                path: tracker.into_path(),
            }
        };

        if !submission.has_query() {
            return Ok(stopped(tracker, SoftStop::EmptyQuery, None));
        }

        let target = match self.resolve_target(&submission.model, submission.base_url.as_deref()) {
            Ok(target) => target,
            Err(stop) => return Ok(stopped(tracker, stop, None)),
        };

        if check_model {
            if let Err(stop) = self.check_model(&target).await {
                return Ok(stopped(tracker, stop, Some(target.model.clone())));
            }
        }

        let query = submission.query.as_str();
        let model = Some(target.model.clone());
        let finish = |tracker: StateTracker, outcome: Outcome| Run {
            id,
            model: model.clone(),
            outcome,
            path: tracker.into_path(),
        };

        // Stage 1: compliance pre-check
        tracker.advance(SessionState::LocalPrecheck);
        tracing::info!("Submission {}: pre-check with local model '{}'", id, target.model);

        let prompt = self.policy.precheck_prompt(query);
        let precheck_review = match self.local.generate(&target, &prompt).await {
            Ok(text) => text,
            Err(e) => match self.failure_mode {
                FailureMode::Legacy => {
                    tracing::warn!("Pre-check failed, continuing with error text: {}", e);
                    format!("[Local validation error: {}]", e)
                }
                FailureMode::Strict => {
                    tracing::warn!("Pre-check failed: {}", e);
                    tracker.advance(SessionState::Failed);
                    return Ok(finish(
                        tracker,
                        Outcome::Failed {
                            stage: FailedStage::Precheck,
                            error: e.to_string(),
                            precheck_review: None,
                        },
                    ));
                }
            },
        };

        if self.policy.evaluate(&precheck_review) == GateDecision::Reject {
            tracing::info!("Submission {}: REJECTED by {} policy", id, self.policy.name());
            tracker.advance(SessionState::Rejected);
            return Ok(finish(
                tracker,
                Outcome::Rejected {
                    review: precheck_review,
                },
            ));
        }

        // Stage 2: cloud answer
        tracker.advance(SessionState::CloudCall);
        tracing::info!(
            "Submission {}: APPROVED, forwarding to {} ({})",
            id,
            self.cloud.name(),
            self.cloud.model()
        );

        let cloud_response = match self.cloud.answer(query).await {
            Ok(text) => text,
            Err(e) => match self.failure_mode {
                FailureMode::Legacy => {
                    tracing::warn!("Cloud call failed, continuing with error text: {}", e);
                    format!("[Error calling cloud LLM: {}]", e)
                }
                FailureMode::Strict => {
                    tracing::warn!("Cloud call failed: {}", e);
                    tracker.advance(SessionState::Failed);
                    return Ok(finish(
                        tracker,
                        Outcome::Failed {
                            stage: FailedStage::Cloud,
                            error: e.to_string(),
                            precheck_review: Some(precheck_review),
                        },
                    ));
                }
            },
        };

        // Stage 3: local review of the answer (never blocks)
        tracker.advance(SessionState::LocalPostcheck);
        tracing::info!("Submission {}: reviewing cloud answer locally", id);

        let review = match self.local.generate(&target, &review_prompt(&cloud_response)).await {
            Ok(text) => Review::Verdict(text),
            Err(e) => match self.failure_mode {
                FailureMode::Legacy => Review::Verdict(format!("[Error calling local LLM: {}]", e)),
                FailureMode::Strict => {
                    tracing::warn!("Post-check failed: {}", e);
                    Review::Unavailable(e.to_string())
                }
            },
        };

        // Stage 4: audit
        let mut record = AuditRecord::new(query, cloud_response.as_str(), review.verdict_text());
        if let Review::Unavailable(error) = &review {
            record = record.with_review_error(error.as_str());
        }
        self.audit.append_async(record.clone()).await?;

        tracker.advance(SessionState::Displayed);
        tracing::info!("Submission {}: completed", id);

        Ok(finish(
            tracker,
            Outcome::Completed(Completion {
                precheck_review,
                cloud_response,
                review,
                record,
            }),
        ))
    }
}

/// Resolve a model choice (and base URL, for transports that need one).
pub fn resolve_target(
    local: &dyn LocalModel,
    model: &ModelChoice,
    base_url: Option<&str>,
) -> Result<LocalTarget, SoftStop> {
    let name = model.resolve().ok_or(SoftStop::MissingModel)?;
    let mut target = LocalTarget::new(name);

    if local.requires_base_url() {
        let url = base_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .or_else(|| local.default_base_url().map(str::trim).filter(|u| !u.is_empty()))
            .ok_or(SoftStop::MissingBaseUrl)?;
        target = target.with_base_url(url);
    }

    Ok(target)
}

/// Look for the target model in the runner's installed-models listing.
pub async fn check_model_available(
    local: &dyn LocalModel,
    target: &LocalTarget,
) -> Result<(), SoftStop> {
    let listing = local.installed_models(target).await.map_err(|e| {
        tracing::warn!("Model check failed: {}", e);
        SoftStop::ModelCheckFailed {
            error: e.to_string(),
        }
    })?;

    if listing_contains(&listing, &target.model) {
        tracing::debug!("Model '{}' is installed", target.model);
        Ok(())
    } else {
        tracing::warn!("Model '{}' not installed", target.model);
        Err(SoftStop::model_not_installed(&target.model))
    }
}
