//! OS signal handling.
//!
//! Translates the host's out-of-band stop request (SIGINT/SIGTERM) into the
//! internal shutdown signal. HTTP-level requests never reach this path.

use tracing::info;

use crate::lifecycle::Shutdown;

/// Resolve when the host asks the process to stop.
pub async fn stop_requested() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, falling back to ctrl-c only");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Spawn a task that triggers `shutdown` on the first stop signal.
pub fn spawn_stop_listener(shutdown: Shutdown) {
    tokio::spawn(async move {
        stop_requested().await;
        info!("stop signal received");
        shutdown.trigger();
    });
}
