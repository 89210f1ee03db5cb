// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-call timeout task.
//
// A `Watchdog` is a scoped handle to a sleeping tokio task: dropping the
// handle aborts the task, so whichever path removes a pending call also
// cancels its timer.

use std::time::Duration;

use jsbridge_core::error::{BridgeError, Result};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Cancellable scheduled task bound to one pending call.
#[derive(Debug)]
pub struct Watchdog {
    task: Option<AbortHandle>,
}

impl Watchdog {
    /// Run `on_fire` after `after` on the current tokio runtime.
    pub fn spawn<F>(after: Duration, on_fire: F) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| {
            BridgeError::Host(format!("no tokio runtime for the call watchdog: {e}"))
        })?;
        let task = runtime.spawn(async move {
            tokio::time::sleep(after).await;
            on_fire();
        });
        Ok(Self {
            task: Some(task.abort_handle()),
        })
    }

    /// Cancel the timer. Equivalent to dropping the handle.
    pub fn cancel(self) {}

    /// Release the handle without aborting. Used by the task itself once it
    /// has fired.
    pub fn disarm(mut self) {
        self.task = None;
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn flag() -> (Arc<AtomicBool>, impl FnOnce() + Send + 'static) {
        let fired = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&fired);
        (fired, move || setter.store(true, Ordering::SeqCst))
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let (fired, on_fire) = flag();
        let watchdog = Watchdog::spawn(Duration::from_millis(500), on_fire).unwrap();

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        watchdog.disarm();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let (fired, on_fire) = flag();
        let watchdog = Watchdog::spawn(Duration::from_millis(500), on_fire).unwrap();
        watchdog.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_prevents_firing() {
        let (fired, on_fire) = flag();
        {
            let _watchdog = Watchdog::spawn(Duration::from_millis(10), on_fire).unwrap();
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn requires_a_runtime() {
        let err = Watchdog::spawn(Duration::from_millis(1), || {}).unwrap_err();
        assert!(matches!(err, BridgeError::Host(_)));
    }
}
