//! HTTP server module
//!
//! A small local API: `GET /status` exposes runtime state, `POST /command`
//! feeds the command handler. It carries no authentication; bind it to a
//! loopback address.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig, context::AppStatus, models::CommandEvent, persistence::HistoryStore,
};

pub mod command;
pub mod error;
pub mod status;

pub use error::{ApiError, ApiServerError};

/// Shared state available to all API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Shared application configuration.
    pub config: Arc<AppConfig>,

    /// Shared runtime status written by the polling loop.
    pub app_status: AppStatus,

    /// The persisted sample history, read-only from here.
    pub history: Arc<HistoryStore>,

    /// Queue feeding the command handler.
    pub command_tx: mpsc::Sender<CommandEvent>,
}

/// Creates the API router with all routes and shared state.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/status", get(status::status))
        .route("/command", post(command::submit_command))
        .with_state(state)
}

/// Runs the HTTP server until the cancellation token fires.
pub async fn run_server_from_config(
    state: ApiState,
    cancellation_token: CancellationToken,
) -> Result<(), ApiServerError> {
    let addr: SocketAddr = state
        .config
        .server
        .listen_address
        .parse()
        .map_err(|_| ApiServerError::InvalidListenAddress(state.config.server.listen_address.clone()))?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "HTTP server listening.");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(cancellation_token.cancelled_owned())
        .await?;

    tracing::info!("HTTP server has shut down.");
    Ok(())
}
