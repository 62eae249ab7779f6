//! Cooperative cancellation tokens.
//!
//! Every blocking path in WARDEN (the remote fetch, the backoff pause)
//! takes a token explicitly instead of relying on ambient interrupt state.
//! A caller under time pressure cancels the token and the in-flight check
//! returns promptly with `WardenError::Cancelled`.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Cooperative cancellation token.
#[async_trait]
pub trait CancelToken: Send + Sync {
    /// Resolves when cancellation is requested.
    async fn cancelled(&self);

    /// Non-blocking cancellation check.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Token that never fires. Use when the caller has no deadline.
pub struct NeverCancel;

#[async_trait]
impl CancelToken for NeverCancel {
    async fn cancelled(&self) {
        std::future::pending::<()>().await;
    }
}

/// Token fired explicitly by calling [`ManualCancel::cancel`].
///
/// Backed by a watch channel, so tasks that start waiting after the
/// token has already fired still observe the cancellation.
pub struct ManualCancel {
    tx: watch::Sender<bool>,
}

impl ManualCancel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for ManualCancel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CancelToken for ManualCancel {
    async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // wait_for inspects the current value before parking, so a token
        // cancelled before this call resolves immediately. The sender lives
        // in self and cannot drop while we are borrowed.
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Token that fires once a deadline passes.
pub struct DeadlineCancel {
    deadline: Instant,
}

impl DeadlineCancel {
    /// Fire at the given instant.
    pub fn at(deadline: Instant) -> Self {
        Self { deadline }
    }

    /// Fire once the given duration has elapsed from now.
    pub fn after(timeout: Duration) -> Self {
        Self::at(Instant::now() + timeout)
    }
}

#[async_trait]
impl CancelToken for DeadlineCancel {
    async fn cancelled(&self) {
        tokio::time::sleep_until(self.deadline).await;
    }

    fn is_cancelled(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
