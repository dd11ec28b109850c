// Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hybrid_assistant::audit::AuditLogger;
use hybrid_assistant::cloud::CloudResponder;
use hybrid_assistant::compliance::SubstringPolicy;
use hybrid_assistant::config::TransportKind;
use hybrid_assistant::errors::{CloudError, LocalModelError};
use hybrid_assistant::local::{LocalModel, LocalTarget};
use hybrid_assistant::pipeline::Pipeline;

/// Local model that replays scripted replies in order and records prompts.
pub struct ScriptedLocal {
    replies: Mutex<VecDeque<Result<String, LocalModelError>>>,
    prompts: Mutex<Vec<String>>,
    listing: String,
    needs_base_url: bool,
    list_calls: AtomicUsize,
}

impl ScriptedLocal {
    pub fn new(replies: Vec<Result<String, LocalModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            listing: "NAME\nmistral:latest\nllama3:latest\n".to_string(),
            needs_base_url: false,
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn with_listing(mut self, listing: &str) -> Self {
        self.listing = listing.to_string();
        self
    }

    /// Behave like the HTTP transport with no configured default URL.
    pub fn requiring_base_url(mut self) -> Self {
        self.needs_base_url = true;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn generate_calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalModel for ScriptedLocal {
    async fn generate(&self, _target: &LocalTarget, prompt: &str) -> Result<String, LocalModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("no script left".to_string()))
    }

    async fn installed_models(&self, _target: &LocalTarget) -> Result<String, LocalModelError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.clone())
    }

    fn transport(&self) -> TransportKind {
        if self.needs_base_url {
            TransportKind::Http
        } else {
            TransportKind::Process
        }
    }

    fn requires_base_url(&self) -> bool {
        self.needs_base_url
    }
}

/// Cloud responder with a fixed reply that counts its calls.
pub struct FakeCloud {
    reply: Result<String, u16>,
    queries: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn answering(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with this HTTP status.
    pub fn failing(status_code: u16) -> Self {
        Self {
            reply: Err(status_code),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CloudResponder for FakeCloud {
    async fn answer(&self, query: &str) -> Result<String, CloudError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(code) => Err(CloudError::Status {
                provider: "fake".to_string(),
                status_code: *code,
                body: "upstream error".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

pub fn pipeline_with(
    local: Arc<ScriptedLocal>,
    cloud: Arc<FakeCloud>,
    audit: AuditLogger,
) -> Pipeline {
    Pipeline::new(local, cloud, Arc::new(SubstringPolicy), audit)
}

pub fn transport_failure() -> LocalModelError {
    LocalModelError::Timeout(60)
}
