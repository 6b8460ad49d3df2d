//! Graceful shutdown fan-out.
//!
//! One `trigger` wakes every waiter: the HTTP server stops accepting and
//! the drain deadline starts.

use std::future::Future;
use tokio::sync::broadcast;

/// Cloneable shutdown handle shared by `main`, the signal listener and the server.
#[derive(Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Future that resolves once `trigger` is called.
    ///
    /// Subscribes eagerly, so a trigger after this call is never missed.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Wake all current waiters. A no-op when nobody is waiting.
    pub fn trigger(&self) {
        let _ = self.notify.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
