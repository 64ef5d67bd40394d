//! OS signal handling.
//!
//! Ctrl-C cancels the running wait instead of killing the process, so the
//! caller can report which transaction was left pending.

use tokio::task::JoinHandle;

use crate::lifecycle::Shutdown;

/// Trigger `shutdown` on the first Ctrl-C.
pub fn spawn_ctrl_c_handler(shutdown: &Shutdown) -> JoinHandle<()> {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        let token = shutdown.token();
        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => {
                        tracing::warn!("Interrupt received, cancelling wait");
                        shutdown.trigger();
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
                }
            }
        }
    })
}
