//! Debounced memo write-back.
//!
//! Each submitted revision cancels the pending timer and starts a new one,
//! so only the last value inside a quiet period reaches the store. The
//! memo is a whole-value overwrite, so a lost intermediate write is never
//! a correctness problem -- the debounce only exists to avoid a store
//! round-trip per keystroke.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::store::Store;

/// Debounced writer for the plan memo.
///
/// `submit` is cheap and non-blocking; the write happens on a background
/// task after [`MemoAutosave::delay`] of quiet. Dropping the component
/// cancels a pending timer, but a write whose timer already fired runs to
/// completion (in-flight store calls are never cancelled).
pub struct MemoAutosave {
    store: Arc<dyn Store>,
    plan_id: String,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl MemoAutosave {
    /// Default quiet period before a submitted memo is written.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(store: Arc<dyn Store>, plan_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            store,
            plan_id: plan_id.into(),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new memo revision, rescheduling the deferred write.
    ///
    /// Must be called from within a tokio runtime. Write failures are
    /// logged and absorbed; the next revision simply tries again.
    pub fn submit(&self, memo: String) {
        let store = Arc::clone(&self.store);
        let plan_id = self.plan_id.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detach the actual write: cancelling the timer must not abort
            // a write that has already been dispatched.
            tokio::spawn(async move {
                if let Err(e) = store.update_memo(&plan_id, &memo).await {
                    warn!(plan_id = %plan_id, error = %format!("{e:#}"), "memo autosave failed");
                }
            });
        });

        let previous = match self.pending.lock() {
            Ok(mut guard) => guard.replace(handle),
            Err(_) => None,
        };
        if let Some(old) = previous {
            old.abort();
        }
    }

    /// Cancel a pending (not yet fired) write.
    pub fn cancel(&self) {
        let previous = match self.pending.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(old) = previous {
            old.abort();
        }
    }

    /// Whether a timer is still waiting to fire.
    pub fn has_pending(&self) -> bool {
        match self.pending.lock() {
            Ok(guard) => guard.as_ref().is_some_and(|h| !h.is_finished()),
            Err(_) => false,
        }
    }
}

impl Drop for MemoAutosave {
    fn drop(&mut self) {
        self.cancel();
    }
}
