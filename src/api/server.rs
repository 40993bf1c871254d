//! TCP bind and serve loop with graceful shutdown.

use std::net::SocketAddr;

use axum::Router;

use crate::config::{APP_NAME, APP_VERSION};

/// Bind the listener and serve until a shutdown signal arrives.
pub async fn serve(router: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tracing::info!(name = APP_NAME, version = APP_VERSION, addr = %local, "API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received, draining connections");
}
