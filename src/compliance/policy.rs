// Compliance gate policies
//
// A policy reads the local model's pre-check reply and decides whether the
// query may go to the cloud. Call sites only see the trait, so the legacy
// substring rule can be swapped for a stricter contract in config.

use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

use super::prompts;
use crate::config::PolicyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateDecision {
    Approve,
    Reject,
}

pub trait CompliancePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pre-check prompt for `query`. Policies with an output contract
    /// extend the base template with their format instructions.
    fn precheck_prompt(&self, query: &str) -> String {
        prompts::precheck_prompt(query)
    }

    fn evaluate(&self, review: &str) -> GateDecision;
}

/// Rejects whenever the lowercased reply contains "no" anywhere.
///
/// Deliberately over-broad: "know", "not" and "none" all trip it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringPolicy;

impl CompliancePolicy for SubstringPolicy {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn evaluate(&self, review: &str) -> GateDecision {
        if review.to_lowercase().contains("no") {
            GateDecision::Reject
        } else {
            GateDecision::Approve
        }
    }
}

/// Requires a `VERDICT: SAFE` line; anything else rejects.
#[derive(Debug, Clone)]
pub struct VerdictLinePolicy {
    verdict: Regex,
}

impl VerdictLinePolicy {
    pub fn new() -> Self {
        Self {
            verdict: Regex::new(r"(?im)^\s*\**\s*VERDICT\s*:\s*\**\s*(SAFE|UNSAFE)\b")
                .expect("verdict pattern is valid"),
        }
    }
}

impl Default for VerdictLinePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl CompliancePolicy for VerdictLinePolicy {
    fn name(&self) -> &'static str {
        "verdict-line"
    }

    fn precheck_prompt(&self, query: &str) -> String {
        format!(
            "{}\n\n\
             Begin your reply with a single line reading exactly `VERDICT: SAFE` if the prompt \
             may be sent to the cloud, or `VERDICT: UNSAFE` if it may not. Put your explanation \
             after that line.",
            prompts::precheck_prompt(query)
        )
    }

    fn evaluate(&self, review: &str) -> GateDecision {
        match self.verdict.captures(review) {
            Some(caps) if caps[1].eq_ignore_ascii_case("SAFE") => GateDecision::Approve,
            _ => GateDecision::Reject,
        }
    }
}

pub fn create_policy(kind: PolicyKind) -> Arc<dyn CompliancePolicy> {
    match kind {
        PolicyKind::Substring => Arc::new(SubstringPolicy),
        PolicyKind::VerdictLine => Arc::new(VerdictLinePolicy::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_rejects_any_no() {
        let policy = SubstringPolicy;
        assert_eq!(policy.evaluate("NO. It contains a patient name."), GateDecision::Reject);
        assert_eq!(policy.evaluate("No"), GateDecision::Reject);
        // Inside unrelated words too
        assert_eq!(policy.evaluate("YES, as far as I know."), GateDecision::Reject);
        assert_eq!(policy.evaluate("YES - there is nothing sensitive"), GateDecision::Reject);
    }

    #[test]
    fn test_substring_approves_without_no() {
        let policy = SubstringPolicy;
        assert_eq!(policy.evaluate("YES. Safe to send."), GateDecision::Approve);
        assert_eq!(policy.evaluate(""), GateDecision::Approve);
        // A transport failure sentinel usually passes
        assert_eq!(
            policy.evaluate("[Local validation error: connection refused]"),
            GateDecision::Approve
        );
    }

    #[test]
    fn test_verdict_line_policy() {
        let policy = VerdictLinePolicy::new();
        assert_eq!(
            policy.evaluate("VERDICT: SAFE\nI know of nothing sensitive here."),
            GateDecision::Approve
        );
        assert_eq!(policy.evaluate("  verdict: safe"), GateDecision::Approve);
        assert_eq!(policy.evaluate("**VERDICT:** SAFE"), GateDecision::Approve);
        assert_eq!(
            policy.evaluate("VERDICT: UNSAFE\nContains an SSN."),
            GateDecision::Reject
        );
        // No verdict line fails closed
        assert_eq!(policy.evaluate("YES, looks fine."), GateDecision::Reject);
        assert_eq!(policy.evaluate("VERDICT: SAFEGUARD needed"), GateDecision::Reject);
    }

    #[test]
    fn test_verdict_line_prompt_extends_template() {
        let policy = VerdictLinePolicy::new();
        let prompt = policy.precheck_prompt("hello");
        assert!(prompt.starts_with(&prompts::precheck_prompt("hello")));
        assert!(prompt.contains("VERDICT: UNSAFE"));

        // The substring policy keeps the plain template
        assert_eq!(SubstringPolicy.precheck_prompt("hello"), prompts::precheck_prompt("hello"));
    }

    #[test]
    fn test_create_policy() {
        assert_eq!(create_policy(PolicyKind::Substring).name(), "substring");
        assert_eq!(create_policy(PolicyKind::VerdictLine).name(), "verdict-line");
    }
}
