// Configuration structs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::*;
use crate::errors;

/// How the local model is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// `ollama run <model>` with the prompt on stdin
    #[default]
    Process,
    /// `POST {base_url}/api/generate`
    Http,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportKind::Process => "process",
            TransportKind::Http => "http",
        }
    }
}

/// What happens when a local or cloud call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// Failures are typed and end the run (post-check failures are recorded).
    #[default]
    Strict,
    /// Failures become bracketed error strings treated as model output.
    Legacy,
}

impl FailureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureMode::Strict => "strict",
            FailureMode::Legacy => "legacy",
        }
    }
}

/// Which compliance gate policy reads the pre-check reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    Substring,
    VerdictLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub transport: TransportKind,
    /// Runner binary for the process transport
    pub program: String,
    /// Ollama endpoint for the http transport (may be blank; then every
    /// submission must supply one)
    pub base_url: String,
    /// Model used when the submission does not pick one
    pub model: String,
    /// Preset list shown by the model selector
    pub models: Vec<String>,
    pub timeout_secs: Option<u64>,
    /// Verify the model is installed before accepting queries
    pub check_availability: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Process,
            program: DEFAULT_LOCAL_PROGRAM.to_string(),
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_LOCAL_MODELS[0].to_string(),
            models: DEFAULT_LOCAL_MODELS.iter().map(|m| m.to_string()).collect(),
            timeout_secs: None,
            check_availability: true,
        }
    }
}

impl LocalConfig {
    /// Effective call timeout: explicit setting, else 60s for http, else none.
    pub fn timeout(&self) -> Option<Duration> {
        match (self.timeout_secs, self.transport) {
            (Some(secs), _) => Some(Duration::from_secs(secs)),
            (None, TransportKind::Http) => {
                Some(Duration::from_secs(DEFAULT_LOCAL_HTTP_TIMEOUT_SECS))
            }
            (None, TransportKind::Process) => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_CLOUD_MODEL.to_string(),
            base_url: DEFAULT_CLOUD_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

// Keeps the key out of debug logs
impl fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CloudConfig {
    /// The API key, or a setup hint if none is configured.
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => anyhow::bail!(errors::api_key_missing_error()),
        }
    }
}

/// Server configuration for `serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Append-only JSONL audit file
    pub audit_log: PathBuf,
    pub failure_mode: FailureMode,
    pub policy: PolicyKind,
    pub local: LocalConfig,
    pub cloud: CloudConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audit_log: PathBuf::from(DEFAULT_AUDIT_LOG),
            failure_mode: FailureMode::default(),
            policy: PolicyKind::default(),
            local: LocalConfig::default(),
            cloud: CloudConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.local.models.iter().all(|m| m.trim().is_empty()) {
            anyhow::bail!(errors::wrap_error_with_suggestion(
                "[local] models must list at least one model",
                "Example:\n  models = [\"mistral\", \"llama3\", \"phi3\"]",
            ));
        }

        if self.local.transport == TransportKind::Process && self.local.program.trim().is_empty()
        {
            anyhow::bail!("[local] program must not be empty for the process transport");
        }

        let base_url = self.local.base_url.trim();
        if self.local.transport == TransportKind::Http
            && !base_url.is_empty()
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            anyhow::bail!(errors::wrap_error_with_suggestion(
                format!("Invalid [local] base_url '{}'", base_url),
                "The base URL must start with http:// or https://",
            ));
        }

        if self.cloud.model.trim().is_empty() {
            anyhow::bail!("[cloud] model must not be empty");
        }

        if self.audit_log.as_os_str().is_empty() {
            anyhow::bail!("audit_log must not be empty");
        }

        Ok(())
    }
}
