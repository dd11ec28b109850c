// Cloud responder
//
// Answers the user's question once the local pre-check has approved it.
// The client is constructed explicitly from configuration and handed to
// the pipeline; there is no process-wide client.

use async_trait::async_trait;

use crate::errors::CloudError;

pub mod openai;
pub mod types;

pub use openai::OpenAiClient;

/// Trait for cloud completion services
#[async_trait]
pub trait CloudResponder: Send + Sync {
    /// Send `query` as a single user message and return the trimmed answer.
    async fn answer(&self, query: &str) -> Result<String, CloudError>;

    /// Provider name (e.g., "openai")
    fn name(&self) -> &str;

    /// Model identifier sent with every request
    fn model(&self) -> &str;
}
