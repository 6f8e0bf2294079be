//! Cooperative cancellation carried over a watch channel.
//!
//! # Design
//! - The signal is a message, not a shared flag; loops observe it between iterations.
//! - Dropping every handle never cancels: a closed channel means "no cancellation will come".

use tokio::sync::watch;

/// Sending half; cancels every cloned [`CancelSignal`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Receiving half observed by long-running loops.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

/// Create a connected handle/signal pair.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Create another signal observing this handle.
    #[must_use]
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelSignal {
    /// A signal that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_, signal) = cancel_pair();
        signal
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is requested; pends forever if it never will be.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancel_wakes_every_signal() {
        let (handle, mut first) = cancel_pair();
        let mut second = handle.signal();
        assert!(!first.is_cancelled());

        handle.cancel();
        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), first.cancelled())
            .await
            .expect("first signal observed cancellation");
        tokio::time::timeout(Duration::from_secs(1), second.cancelled())
            .await
            .expect("second signal observed cancellation");
        assert!(second.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn never_signal_stays_pending() {
        let mut signal = CancelSignal::never();
        let waited = tokio::time::timeout(Duration::from_secs(60), signal.cancelled()).await;
        assert!(waited.is_err());
        assert!(!signal.is_cancelled());
    }
}
