use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::debug;

use crate::error::QueryError;

/// Cancellable unit of work shared by every API call of one invocation.
///
/// Clones share the same signal: cancelling any clone aborts requests that are
/// in flight on every other clone and refuses to start new ones.
#[derive(Clone, Debug, Default)]
pub struct WorkContext {
    termination_signal: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl WorkContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.termination_signal.swap(true, Ordering::SeqCst) {
            debug!("Work context cancelled");
        }
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.termination_signal.load(Ordering::SeqCst)
    }

    pub fn ensure_active(&self) -> Result<(), QueryError> {
        if self.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        Ok(())
    }

    /// Resolves once the context is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // register before checking the flag so a concurrent cancel is not lost
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// Runs `request` unless the context is cancelled first.
    pub async fn run<F, T>(&self, request: F) -> Result<T, QueryError>
    where
        F: Future<Output = Result<T, QueryError>>,
    {
        self.ensure_active()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(QueryError::Cancelled),
            result = request => result,
        }
    }
}
