// HTTP request handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::ServerState;
use crate::pipeline::{ModelChoice, Outcome, Submission};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub query: String,
    /// Preset name or "custom"; defaults to the configured model
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub custom_model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl SubmitRequest {
    fn into_submission(self, default_model: &str) -> Submission {
        let selector = self.model.as_deref().unwrap_or(default_model);
        let choice = ModelChoice::from_selector(selector, self.custom_model.as_deref());
        Submission::new(self.query, choice).with_base_url(self.base_url)
    }
}

pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/v1/submit", post(handle_submit))
        .route("/health", get(health_check))
        .with_state(state)
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Run one submission. Soft stops are 400; completed, rejected and failed
/// runs are 200; an audit write failure is 500.
pub async fn handle_submit(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    let submission = request.into_submission(&state.default_model);

    match state.pipeline.submit_checked(&submission).await {
        Ok(run) => {
            let status = match run.outcome {
                Outcome::Stopped { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::OK,
            };
            (status, Json(run)).into_response()
        }
        Err(e) => {
            tracing::error!("Submission failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            )
                .into_response()
        }
    }
}
