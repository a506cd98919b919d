//! A cloneable handle for stopping a running task from external code.

use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio_util::sync::CancellationToken;

/// A cloneable handle for stopping a running task from external code.
///
/// The cancellation token is replaced for every iteration, but the
/// intentional-stop flag survives iteration boundaries: a stop requested
/// during a retry backoff still prevents the next request from opening.
#[derive(Clone)]
pub struct TaskHandle {
    pub(crate) cancel: Arc<Mutex<CancellationToken>>,
    stop_requested: Arc<AtomicBool>,
    is_running: Arc<AtomicBool>,
    idle_notify: Arc<tokio::sync::Notify>,
}

impl TaskHandle {
    pub(crate) fn new() -> Self {
        Self {
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            stop_requested: Arc::new(AtomicBool::new(false)),
            is_running: Arc::new(AtomicBool::new(false)),
            idle_notify: Arc::new(tokio::sync::Notify::new()),
        }
    }

    /// Request a stop: record the intent, then cancel the in-flight request.
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.cancel.lock().cancel();
    }

    /// Whether the user requested a stop
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Install a fresh cancellation token for the next iteration.
    /// A stop that raced the swap still cancels the new token.
    pub(crate) fn fresh_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        if self.stop_requested() {
            token.cancel();
        }
        token
    }

    /// Reset for a new task submission
    pub(crate) fn begin(&self) {
        self.stop_requested.store(false, Ordering::Release);
        *self.cancel.lock() = CancellationToken::new();
        self.is_running.store(true, Ordering::Release);
    }

    /// Mark the task finished and wake idle waiters
    pub(crate) fn finish(&self) {
        self.is_running.store(false, Ordering::Release);
        self.idle_notify.notify_waiters();
    }

    /// Whether a task submission is currently running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
    }

    /// Wait until the driver becomes idle (finishes running)
    pub async fn wait_for_idle(&self) {
        let notified = self.idle_notify.notified();
        if !self.is_running() {
            return;
        }
        notified.await;
    }
}
