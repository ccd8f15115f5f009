pub mod host;
pub mod pages;
pub mod provider;
pub mod reconcile;
pub mod routes;
pub mod services;
pub mod state;

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use rp_common::{
    config::GatewayConfig,
    error::{AppError, AppResult},
};
use state::AppState;
use tracing::info;

pub fn app_from_config(config: GatewayConfig) -> AppResult<Router> {
    let state = Arc::new(AppState::new(config)?);
    Ok(routes::build_router(state))
}

pub async fn serve(config: GatewayConfig) -> AppResult<()> {
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|e| AppError::Config(format!("invalid RZP_BIND_ADDR: {e}")))?;
    let gateway_id = config.gateway_id.clone();
    let app = app_from_config(config)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Internal(format!("bind failed: {e}")))?;
    info!(%addr, %gateway_id, "payment gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .map_err(|e| AppError::Internal(format!("server error: {e}")))
}
