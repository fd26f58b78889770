//! Tokenization server.
//!
//! Serves tokenization requests over HTTP against every registered
//! dictionary at once. The [`service::TokenizeService`] holds the shared state
//! (registry, tokenizer cache, renderer); [`routes::router`] exposes it.

pub mod config;
pub mod decode;
pub mod graph;
pub mod render;
pub mod routes;
pub mod service;

use std::sync::Arc;

use log::info;
use tokio::net::TcpListener;

use crate::error::{PolydictError, Result};

pub use config::{FailurePolicy, ServerConfig};
pub use service::{TokenizeRequest, TokenizeResponse, TokenizeService};

/// Bind to the configured address and serve until Ctrl-C.
pub async fn serve(service: Arc<TokenizeService>) -> Result<()> {
    let address = service.config().bind_address();
    if service.config().preload {
        let preload = Arc::clone(&service);
        tokio::task::spawn_blocking(move || preload.preload())
            .await
            .map_err(|e| PolydictError::other(format!("preload failed: {e}")))?;
    }

    let listener = TcpListener::bind(&address).await?;
    info!(
        "Serving {} dictionary(ies) on http://{address}/tokenizer/tokenize",
        service.dictionary_names().len()
    );

    axum::serve(listener, routes::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
