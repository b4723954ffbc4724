use std::sync::Arc;

use anyhow::Context;

use fakestore_api::app::{build_app, services};
use fakestore_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fakestore_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let addr = config.socket_addr()?;

    let services = Arc::new(services::build_services(&config.store).await?);
    let app = build_app(services.clone());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("Server running on http://{}/api", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.shutdown().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
