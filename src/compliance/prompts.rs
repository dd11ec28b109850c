// Prompt templates for the local compliance checks

/// Compliance pre-check wrapped around the user's query.
pub fn precheck_prompt(query: &str) -> String {
    format!(
        "You are a data compliance assistant.\n\
         Does the following prompt contain any PII, PHI, confidential, proprietary, or internal information? \
         Is it safe to send this prompt to a cloud-based LLM provider? Answer only YES or NO and explain.\n\n\
         Prompt:\n{}",
        query
    )
}

/// Post-check review wrapped around the cloud answer.
pub fn review_prompt(cloud_response: &str) -> String {
    format!(
        "You are a regulatory compliance expert. Review the following cloud-generated answer:\n\n\
         {}\n\n\
         Is it accurate, compliant, and free of hallucinations or misstatements?",
        cloud_response
    )
}
