// HTTP transport - Ollama's /api/generate and /api/tags endpoints

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{LocalModel, LocalTarget};
use crate::config::constants::MISSING_RESPONSE_PLACEHOLDER;
use crate::config::TransportKind;
use crate::errors::LocalModelError;

/// Local model reached over Ollama's REST API
#[derive(Clone)]
pub struct HttpModel {
    client: Client,
    default_base_url: String,
    timeout: Option<Duration>,
}

impl HttpModel {
    pub fn new(default_base_url: String, timeout: Option<Duration>) -> Result<Self, LocalModelError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            default_base_url,
            timeout,
        })
    }

    /// Endpoint for `target`, falling back to the configured default.
    fn base_url<'a>(&'a self, target: &'a LocalTarget) -> Result<&'a str, LocalModelError> {
        let url = target
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.default_base_url.trim())
            .trim_end_matches('/');

        if url.is_empty() {
            return Err(LocalModelError::MissingBaseUrl);
        }
        Ok(url)
    }

    fn map_request_error(&self, err: reqwest::Error) -> LocalModelError {
        match self.timeout {
            Some(limit) if err.is_timeout() => LocalModelError::Timeout(limit.as_secs()),
            _ => LocalModelError::Request(err),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LocalModelError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(LocalModelError::Http {
            status_code: status.as_u16(),
            message: body,
        })
    }
}

#[async_trait]
impl LocalModel for HttpModel {
    async fn generate(&self, target: &LocalTarget, prompt: &str) -> Result<String, LocalModelError> {
        let url = format!("{}/api/generate", self.base_url(target)?);
        let request = GenerateRequest {
            model: &target.model,
            prompt,
            stream: false,
        };

        tracing::debug!("Sending request to local model at {}: {:?}", url, request);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let generated: GenerateResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| self.map_request_error(e))?;

        tracing::debug!("Received local response: {:?}", generated);

        Ok(generated
            .response
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| MISSING_RESPONSE_PLACEHOLDER.to_string()))
    }

    async fn installed_models(&self, target: &LocalTarget) -> Result<String, LocalModelError> {
        let url = format!("{}/api/tags", self.base_url(target)?);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let tags: TagsResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| self.map_request_error(e))?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| m.name)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn transport(&self) -> TransportKind {
        TransportKind::Http
    }

    fn requires_base_url(&self) -> bool {
        true
    }

    fn default_base_url(&self) -> Option<&str> {
        Some(&self.default_base_url)
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_prefers_target() {
        let model = HttpModel::new("http://localhost:11434/".to_string(), None).unwrap();

        let target = LocalTarget::new("mistral");
        assert_eq!(model.base_url(&target).unwrap(), "http://localhost:11434");

        let target = LocalTarget::new("mistral").with_base_url("http://gpu-box:11434/");
        assert_eq!(model.base_url(&target).unwrap(), "http://gpu-box:11434");

        let target = LocalTarget::new("mistral").with_base_url("   ");
        assert_eq!(model.base_url(&target).unwrap(), "http://localhost:11434");
    }

    #[test]
    fn test_blank_base_url_is_an_error() {
        let model = HttpModel::new(String::new(), None).unwrap();
        let err = model.base_url(&LocalTarget::new("mistral")).unwrap_err();
        assert!(matches!(err, LocalModelError::MissingBaseUrl));
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateRequest {
            model: "llama3",
            prompt: "hello",
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "llama3", "prompt": "hello", "stream": false})
        );
    }
}
