// OpenAI chat-completion client
//
// Works for any OpenAI-compatible endpoint; the base URL and model come
// from configuration.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::{ChatRequest, ChatResponse};
use super::CloudResponder;
use crate::config::CloudConfig;
use crate::errors::CloudError;

const PROVIDER_NAME: &str = "openai";

/// OpenAI API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client. `timeout` of `None` keeps reqwest's default (no limit).
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, CloudError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| CloudError::Transport {
            provider: PROVIDER_NAME.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    /// Build from the `[cloud]` section; fails if no API key is set.
    pub fn from_config(config: &CloudConfig) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = Self::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )?;
        Ok(client)
    }

    /// Send a single request (no retry)
    async fn send_once(&self, request: &ChatRequest) -> Result<ChatResponse, CloudError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!("Sending request to OpenAI API: {:?}", request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|source| CloudError::Transport {
                provider: PROVIDER_NAME.to_string(),
                source,
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudError::Status {
                provider: PROVIDER_NAME.to_string(),
                status_code: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|source| CloudError::Parse {
                provider: PROVIDER_NAME.to_string(),
                source,
            })?;

        tracing::debug!("Received response: {:?}", chat_response);

        Ok(chat_response)
    }
}

#[async_trait]
impl CloudResponder for OpenAiClient {
    async fn answer(&self, query: &str) -> Result<String, CloudError> {
        let request = ChatRequest::single_turn(&self.model, query);
        let response = self.send_once(&request).await?;
        response
            .first_text()
            .ok_or_else(|| CloudError::EmptyChoices(PROVIDER_NAME.to_string()))
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}
