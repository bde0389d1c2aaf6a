//! Stop signal shared by the proxy listener and whoever owns its lifetime.
//!
//! `main` hands one receiver to [`HttpServer::run`](crate::HttpServer::run)
//! and parks the sender behind the OS signal future. Integration tests keep
//! the sender instead and call `trigger` when the test body is done. Either
//! way axum stops accepting, finishes in-flight solver calls, then returns.

use std::future::Future;

use tokio::sync::broadcast;

/// Sender half of the proxy's stop signal.
///
/// Dropping it counts as a trigger: every receiver resolves once the
/// channel closes, so a listener never outlives its owner.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one listener's graceful-shutdown future.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop every subscribed listener. Calling it with none subscribed is a no-op.
    pub fn trigger(&self) {
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners, "Stop signal sent");
    }

    /// Wait for `cause`, then stop the listeners.
    pub async fn trigger_after<F>(self, cause: F)
    where
        F: Future<Output = ()>,
    {
        cause.await;
        self.trigger();
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` sees the stop signal or its [`Shutdown`] is dropped.
pub async fn signalled(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}
