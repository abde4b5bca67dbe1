//! HTTP surface: the image-to-prompt route and its status probe.

pub mod handlers;
pub mod messages;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::config::ServerConfig;
use crate::coze::CozeClient;

pub const PROMPT_ROUTE: &str = "/api/tools/image-to-prompt";

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub client: CozeClient,
    pub server: ServerConfig,
}

pub fn router(state: AppState) -> Router {
    let max_upload = state.server.max_upload_bytes;
    Router::new()
        .route("/", get(|| async { "img2prompt is running" }))
        .route(
            PROMPT_ROUTE,
            get(handlers::get_status).post(handlers::post_image_to_prompt),
        )
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(Arc::new(state))
}

/// Bind `state.server.addr()` and serve until the process is stopped.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    log::info!("listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("shutting down");
        })
        .await
        .context("server error")?;
    Ok(())
}
