// Project-wide constants
//
// Centralised here so ports, paths and model names have one source of
// truth. Import via `use crate::config::constants::*;`.

/// Directory under `$HOME` holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".hybrid-assistant";

/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Audit log path, relative to the working directory unless configured.
pub const DEFAULT_AUDIT_LOG: &str = "audit_log.json";

/// Local model runner binary for the process transport.
pub const DEFAULT_LOCAL_PROGRAM: &str = "ollama";

/// Ollama's default HTTP endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Preset local models offered by the model selector.
pub const DEFAULT_LOCAL_MODELS: &[&str] = &["mistral", "llama3", "phi3"];

/// Selector entry that switches to a user-typed model name.
pub const CUSTOM_MODEL_CHOICE: &str = "custom";

/// Timeout for local HTTP calls when none is configured.
///
/// The process transport has no default timeout.
pub const DEFAULT_LOCAL_HTTP_TIMEOUT_SECS: u64 = 60;

/// Returned by the HTTP transport when the reply has no `response` field.
pub const MISSING_RESPONSE_PLACEHOLDER: &str = "No response from local model.";

pub const DEFAULT_CLOUD_MODEL: &str = "gpt-4o";

pub const DEFAULT_CLOUD_BASE_URL: &str = "https://api.openai.com";

/// Default bind address for `serve` (localhost only).
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8000";
