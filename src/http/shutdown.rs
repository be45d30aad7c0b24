//! Termination signal handling.
//!
//! The signal listener is installed once, before the database connection is
//! attempted, so a SIGTERM during startup still ends the process cleanly. On
//! SIGTERM or SIGINT the database connection is closed and the server stops
//! at once. In-flight requests are not drained; the orchestrator has already
//! moved traffic to the other side by the time it signals this one.

use std::future::Future;

use axum_server::Handle;
use tokio::sync::watch;

use crate::state::AppState;

/// Receiver that flips to `true` once SIGTERM or SIGINT has arrived
pub type Termination = watch::Receiver<bool>;

/// Install the SIGTERM/SIGINT listener for the life of the process.
pub fn listen_for_termination() -> Termination {
    let (tx, rx) = watch::channel(false);

    // Registered here rather than inside the task so no signal is missed
    #[cfg(unix)]
    let sigterm = match tokio::signal::unix::signal(
        tokio::signal::unix::SignalKind::terminate(),
    ) {
        Ok(sigterm) => Some(sigterm),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            None
        }
    };

    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match sigterm {
                Some(mut sigterm) => {
                    sigterm.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, shutting down");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, shutting down");
            }
        }

        let _ = tx.send(true);
    });

    rx
}

/// Resolve once termination has been signalled.
pub async fn terminated(mut termination: Termination) {
    // Sender gone without a signal: no signal will ever come
    if termination.wait_for(|received| *received).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Spawn the task that closes the database and stops the server on termination.
pub fn setup_shutdown_handler(handle: Handle, state: AppState, termination: Termination) {
    tokio::spawn(shutdown_on(terminated(termination), handle, state));
}

/// Wait for `signal`, close the database and stop the server immediately.
pub async fn shutdown_on<F>(signal: F, handle: Handle, state: AppState)
where
    F: Future<Output = ()>,
{
    signal.await;

    tracing::info!("Closing database connection");
    state.db.close().await;

    handle.shutdown();
    tracing::info!("Server stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_terminated_resolves_after_signal() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), terminated(rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_terminated_waits_without_signal() {
        let (tx, rx) = watch::channel(false);
        let waited = tokio::time::timeout(Duration::from_millis(50), terminated(rx)).await;
        assert!(waited.is_err());

        // A dropped sender never counts as a signal
        let rx = tx.subscribe();
        drop(tx);
        let waited = tokio::time::timeout(Duration::from_millis(50), terminated(rx)).await;
        assert!(waited.is_err());
    }
}
