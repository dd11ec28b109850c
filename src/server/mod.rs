// Server module
// JSON-over-HTTP front end for the hybrid pipeline

mod handlers;

pub use handlers::{create_router, handle_submit, health_check, SubmitRequest};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::pipeline::Pipeline;

/// Queries are natural language; anything bigger than this is refused.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state handed to every request
pub struct ServerState {
    pub pipeline: Pipeline,
    /// Model used when a request names none
    pub default_model: String,
}

pub struct AppServer {
    state: Arc<ServerState>,
    bind_address: String,
}

impl AppServer {
    pub fn new(pipeline: Pipeline, default_model: String, bind_address: String) -> Self {
        Self {
            state: Arc::new(ServerState {
                pipeline,
                default_model,
            }),
            bind_address,
        }
    }

    pub fn router(&self) -> axum::Router {
        create_router(Arc::clone(&self.state))
            .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_address))?;
        let app = self.router();

        tracing::info!("Starting hybrid-assistant server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
