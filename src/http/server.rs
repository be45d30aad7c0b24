//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::state::AppState;

use super::shutdown::{self, Termination};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the HTTP server.
///
/// Runs until the listener fails or a termination signal stops it. Returns
/// `Ok(())` after a signal-initiated stop.
pub async fn start_server(
    app: Router,
    state: &AppState,
    termination: Termination,
) -> Result<(), ServerError> {
    let http = &state.config.http;
    let addr: SocketAddr = format!("{}:{}", http.host, http.port)
        .parse::<SocketAddr>()
        .map_err(|e| ServerError::Address(e.to_string()))?;

    let handle = Handle::new();

    shutdown::setup_shutdown_handler(handle.clone(), state.clone(), termination);
    announce_when_listening(handle.clone(), state.clone());

    tracing::info!(%addr, "Starting HTTP server");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// Log the startup summary once the listener is bound.
fn announce_when_listening(handle: Handle, state: AppState) {
    tokio::spawn(async move {
        if let Some(addr) = handle.listening().await {
            let deployment = state.deployment();
            tracing::info!(
                environment = %deployment.color.to_uppercase(),
                version = %deployment.version,
                port = addr.port(),
                hostname = %state.host.hostname,
                "Server started successfully"
            );
        }
    });
}
