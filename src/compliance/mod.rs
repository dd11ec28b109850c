// Compliance checks run by the local model
//
// `prompts` holds the fixed pre-check and review templates; `policy` decides
// whether a pre-check reply lets the query through to the cloud.

pub mod policy;
pub mod prompts;

pub use policy::{create_policy, CompliancePolicy, GateDecision, SubstringPolicy, VerdictLinePolicy};
pub use prompts::{precheck_prompt, review_prompt};
