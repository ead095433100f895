use anyhow::Context as _;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use accounts_api::{
    app, init_tracing,
    service::config::{ConfigService, ConfigServiceImpl},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: Arc<dyn ConfigService> =
        Arc::new(ConfigServiceImpl::from_env().context("invalid configuration")?);
    init_tracing(config.values());

    let state = AppState::new(config).await?;
    let router = app(state.clone());

    let bind_addr = format!("0.0.0.0:{}", state.config().port());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    info!(%bind_addr, "accounts api listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    state
        .db()
        .conn()
        .clone()
        .close()
        .await
        .context("failed to close database pool")?;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
