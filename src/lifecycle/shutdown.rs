//! Shutdown coordination for served applications.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Clones share one flag. Once triggered it stays triggered, so waiters
/// created afterwards resolve immediately.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A future that resolves once `trigger` has been called.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // An error means the sender is gone; nothing can trigger anymore,
            // so stopping is the only sensible outcome.
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }

    pub fn trigger(&self) {
        let already = self.tx.send_replace(true);
        if !already {
            tracing::info!(waiters = self.tx.receiver_count(), "Shutdown triggered");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
