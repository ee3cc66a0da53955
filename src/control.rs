//! One-shot cancellation signalling for generator lifecycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// One-shot, monotonic cancellation token shared between a generator
/// façade and its mediator task.
///
/// Once triggered the token never reverts. Clones share the same
/// underlying signal, so a producer holding a clone can race its own
/// sends against cancellation.
#[derive(Clone, Default)]
pub struct StopToken {
    inner: Arc<StopState>,
}

#[derive(Default)]
struct StopState {
    triggered: AtomicBool,
    notify: Notify,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token. The first call performs the transition and wakes
    /// every waiter; later calls are no-ops.
    ///
    /// Returns whether this call was the one that triggered.
    pub fn trigger(&self) -> bool {
        let first = self
            .inner
            .triggered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    /// Non-blocking check of the current state.
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::Acquire)
    }

    /// Suspend until the token fires. Returns immediately if it already
    /// has.
    pub async fn triggered(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a trigger racing this
            // call cannot slip between the check and the await.
            notified.as_mut().enable();
            if self.is_triggered() {
                return;
            }
            notified.await;
        }
    }
}

impl std::fmt::Debug for StopToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopToken")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}
