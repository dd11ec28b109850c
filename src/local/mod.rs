// Local model transports
//
// The local model runs the compliance pre-check and the post-check review.
// Two transports sit behind one trait: a subprocess (`ollama run <model>`)
// and Ollama's HTTP API (`POST /api/generate`).

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::config::{LocalConfig, TransportKind};
use crate::errors::LocalModelError;

pub mod http;
pub mod process;

pub use http::HttpModel;
pub use process::ProcessModel;

/// Which model a local call goes to, and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalTarget {
    pub model: String,
    /// Only set for transports that need an endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl LocalTarget {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Trait for local model runners
#[async_trait]
pub trait LocalModel: Send + Sync {
    /// Run `prompt` through the target model and return its reply text.
    async fn generate(&self, target: &LocalTarget, prompt: &str) -> Result<String, LocalModelError>;

    /// Raw listing of installed models. Availability is a substring test
    /// against this text.
    async fn installed_models(&self, target: &LocalTarget) -> Result<String, LocalModelError>;

    fn transport(&self) -> TransportKind;

    /// Whether each submission must resolve to a base URL.
    fn requires_base_url(&self) -> bool {
        false
    }

    /// Base URL used when a submission leaves it blank.
    fn default_base_url(&self) -> Option<&str> {
        None
    }
}

/// Shell command that installs `model`.
pub fn remediation_command(model: &str) -> String {
    format!("ollama pull {}", model)
}

/// Whether `model` appears anywhere in an installed-models listing.
///
/// Plain substring match, so `mistral` is satisfied by `mistral:latest`.
pub fn listing_contains(listing: &str, model: &str) -> bool {
    listing.contains(model)
}

/// Build the configured transport.
pub fn create_local_model(config: &LocalConfig) -> Result<Arc<dyn LocalModel>, LocalModelError> {
    let model: Arc<dyn LocalModel> = match config.transport {
        TransportKind::Process => Arc::new(
            ProcessModel::new(config.program.clone()).with_timeout(config.timeout()),
        ),
        TransportKind::Http => Arc::new(HttpModel::new(config.base_url.clone(), config.timeout())?),
    };
    tracing::debug!("Local model transport: {}", model.transport().as_str());
    Ok(model)
}
