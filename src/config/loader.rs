// Configuration loader
// Reads ~/.hybrid-assistant/config.toml (or --config), then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use super::settings::Config;
use crate::errors;

/// `~/.hybrid-assistant/config.toml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// if present and built-in defaults otherwise. Environment overrides are
/// applied last, then the result is validated.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => match default_config_path() {
            Some(default) if default.exists() => read_config_file(&default)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|_e| {
        anyhow::anyhow!(errors::file_not_found_error(
            &path.display().to_string(),
            "Configuration file"
        ))
    })?;

    tracing::debug!("Loaded config from {}", path.display());
    parse_config(&contents)
}

/// Parse TOML text into a [`Config`]; missing fields take defaults.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| anyhow::anyhow!(errors::config_parse_error(&e.to_string())))
}

/// Apply environment overrides through `lookup` (normally `std::env::var`).
///
/// - `OPENAI_API_KEY` fills the cloud key when the file has none
/// - `HYBRID_LOCAL_MODEL` replaces the default local model
/// - `HYBRID_LOCAL_BASE_URL` replaces the local base URL
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let has_key = config
        .cloud
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !has_key {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.cloud.api_key = Some(key);
        }
    }

    if let Some(model) = lookup("HYBRID_LOCAL_MODEL").filter(|m| !m.trim().is_empty()) {
        config.local.model = model;
    }

    if let Some(url) = lookup("HYBRID_LOCAL_BASE_URL").filter(|u| !u.trim().is_empty()) {
        config.local.base_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FailureMode, PolicyKind, TransportKind};
    use std::collections::HashMap;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            audit_log = "/tmp/audit.jsonl"
            failure_mode = "legacy"
            policy = "verdict-line"

            [local]
            transport = "http"
            base_url = "http://gpu-box:11434"
            model = "llama3"
            models = ["llama3", "phi3"]
            timeout_secs = 30

            [cloud]
            api_key = "sk-test"
            model = "gpt-4o-mini"

            [server]
            bind_address = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.audit_log, PathBuf::from("/tmp/audit.jsonl"));
        assert_eq!(config.failure_mode, FailureMode::Legacy);
        assert_eq!(config.policy, PolicyKind::VerdictLine);
        assert_eq!(config.local.transport, TransportKind::Http);
        assert_eq!(config.local.base_url, "http://gpu-box:11434");
        assert_eq!(config.local.models, vec!["llama3", "phi3"]);
        assert_eq!(config.local.timeout_secs, Some(30));
        assert_eq!(config.cloud.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.cloud.model, "gpt-4o-mini");
        assert_eq!(config.cloud.base_url, "https://api.openai.com");
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.local.model, "mistral");
        assert_eq!(config.local.program, "ollama");
        assert!(config.local.check_availability);
    }

    #[test]
    fn test_parse_error_is_friendly() {
        let err = parse_config("[local]\ntransport = \"carrier-pigeon\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("HYBRID_LOCAL_MODEL", "phi3"),
            ("HYBRID_LOCAL_BASE_URL", "http://10.0.0.2:11434"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.cloud.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.local.model, "phi3");
        assert_eq!(config.local.base_url, "http://10.0.0.2:11434");
    }

    #[test]
    fn test_file_api_key_wins_over_env() {
        let mut config = Config::default();
        config.cloud.api_key = Some("sk-file".to_string());
        apply_env_overrides(&mut config, |k| {
            (k == "OPENAI_API_KEY").then(|| "sk-env".to_string())
        });
        assert_eq!(config.cloud.api_key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn test_explicit_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
