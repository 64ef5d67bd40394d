//! Cancellation coordination for long waits.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Coordinator for aborting an in-flight confirmation wait.
///
/// Wraps a cancellation token that signal handlers and deadlines trigger and
/// the waiter observes.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    /// Create a new coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token to hand to the waiter.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Trigger cancellation.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// Trigger cancellation once `deadline` has elapsed.
    pub fn trigger_after(&self, deadline: Duration) -> JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(deadline) => {
                    tracing::warn!(deadline_secs = deadline.as_secs(), "Wall-clock deadline reached");
                    token.cancel();
                }
            }
        })
    }
}
