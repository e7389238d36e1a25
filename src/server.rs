use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::contract::{ContractDocument, ContractError, ContractValidator, ValidationOptions};

/// Loads the contract, creates empty stores and wires the router.
pub fn build(config: &AppConfig) -> Result<Router, ContractError> {
    let document = ContractDocument::load(config.contract.path.as_deref())?;
    let validator = ContractValidator::new(document, ValidationOptions::from_config(config))?;
    let state = AppState::new(validator, &config.docs);
    Ok(app(state, config))
}

pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let app = build(config).context("failed to load the API contract")?;

    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Storefront API listening on http://{}", listener.local_addr()?);
    if config.docs.enabled {
        tracing::info!("Interactive documentation at {}", config.docs.path);
    }

    serve_on(listener, app).await
}

/// Serves `app` on an already bound listener until Ctrl-C.
pub async fn serve_on(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server");
}
