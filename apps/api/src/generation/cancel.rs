//! Caller-supplied cancellation for upstream calls.
//!
//! A `CancelSignal` fires when its `CancelHandle` is triggered or when its
//! deadline passes, whichever comes first. Clones observe the same signal.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Returned by `CancelSignal::run` when the signal fired before the work finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // send_replace succeeds even when every receiver is gone
        self.tx.send_replace(true);
    }

    /// Converts the handle into a guard that cancels when dropped.
    pub fn cancel_on_drop(self) -> CancelOnDrop {
        CancelOnDrop(self)
    }
}

/// Fires its signal on drop. Held by a request future so that an abandoned
/// request also stops the tasks it spawned.
#[derive(Debug)]
pub struct CancelOnDrop(CancelHandle);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        // Dropping the sender leaves the receiver readable with `false` forever.
        drop(tx);
        Self { rx, deadline: None }
    }

    /// A signal fired explicitly through the returned handle.
    pub fn manual() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Self { rx, deadline: None })
    }

    /// Adds (or tightens) a deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the signal fires. Pends forever for `never()`.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let triggered = async move {
            loop {
                if *rx.borrow_and_update() {
                    return;
                }
                if rx.changed().await.is_err() {
                    // Sender dropped without cancelling: can no longer fire.
                    std::future::pending::<()>().await;
                }
            }
        };

        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = triggered => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => triggered.await,
        }
    }

    /// Drives `work` to completion unless the signal fires first.
    pub async fn run<F: Future>(&self, work: F) -> Result<F::Output, Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            output = work => Ok(output),
        }
    }
}
