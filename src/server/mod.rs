//! Server module - HTTP API
//!
//! Routes, shared state, SSE streaming and the listen loop.

mod error;
mod routes;
mod sse;

use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::{Config, Result};
use crate::extract::ExtractionPipeline;
use crate::inference::{AskService, HuggingFaceClient};
use crate::search::{SearchProvider, SerpApiClient};

pub use error::ErrorBody;
pub use sse::{DONE_MARKER, RESULT_PREFIX};

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ExtractionPipeline>,
    pub ask: Arc<AskService>,
}

impl AppState {
    pub fn new(pipeline: Arc<ExtractionPipeline>, ask: Arc<AskService>) -> Self {
        Self { pipeline, ask }
    }

    /// Wire up the production search, extractors and inference client
    pub fn from_config(config: &Config) -> Result<Self> {
        let search: Arc<dyn SearchProvider> = Arc::new(SerpApiClient::from_config(&config.search)?);
        let model = HuggingFaceClient::from_config(&config.inference)?;

        Ok(Self::new(
            Arc::new(ExtractionPipeline::from_config(config)?),
            Arc::new(AskService::new(search, model, config.search.max_results)),
        ))
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/server-info", get(routes::server_info))
        .route("/extract", post(routes::extract))
        .route("/extract_stream", post(routes::extract_stream_start))
        .route("/extract_stream_sse", get(sse::extract_stream_sse))
        .route("/ask", post(routes::ask))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let addr = config.listen_addr()?;
    let state = AppState::from_config(config)?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        model = state.ask.model_name(),
        extractors = ?state.pipeline.extractor_names(),
        "vidscout listening"
    );

    serve_on(listener, state, shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
