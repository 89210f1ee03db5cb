// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pending-call registry.
//
// Maps correlation ids to parked waiters. Each entry owns its watchdog, so
// removing an entry and cancelling its timer are one step. Every settlement
// path (delivery, timeout, rollback) starts by removing the entry under the
// lock; whichever path removes it first is the only one that can settle it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use jsbridge_core::error::{BridgeError, Result};
use jsbridge_core::types::{CorrelationId, RawResult};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::correlation;
use crate::normalize;
use crate::pending::Outcome;
use crate::watchdog::Watchdog;

/// A parked call. Never mutated once stored.
struct PendingCall {
    waiter: oneshot::Sender<Outcome>,
    watchdog: Watchdog,
}

type CallMap = HashMap<CorrelationId, PendingCall>;

// The map holds no cross-entry invariant, so a panic elsewhere cannot leave
// it half-updated.
fn lock(calls: &Mutex<CallMap>) -> MutexGuard<'_, CallMap> {
    calls.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of in-flight calls keyed by correlation id.
///
/// Dropping the registry drops every parked waiter; their callers see
/// `BridgeError::Shutdown`.
pub struct PendingCallRegistry {
    calls: Arc<Mutex<CallMap>>,
    timeout: Duration,
}

impl PendingCallRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Park a new call: allocate an id, arm its watchdog, and store the
    /// waiter. Must run inside a tokio runtime.
    pub fn register(&self) -> Result<(CorrelationId, oneshot::Receiver<Outcome>)> {
        let (waiter, receiver) = oneshot::channel();
        let mut calls = lock(&self.calls);

        let mut callback_id = correlation::generate();
        while calls.contains_key(&callback_id) {
            callback_id = correlation::generate();
        }

        // Armed while the lock is held so the watchdog cannot look for the
        // entry before it exists.
        let watchdog = self.arm_watchdog(callback_id.clone())?;
        calls.insert(callback_id.clone(), PendingCall { waiter, watchdog });
        debug!(%callback_id, pending = calls.len(), "call registered");

        Ok((callback_id, receiver))
    }

    fn arm_watchdog(&self, callback_id: CorrelationId) -> Result<Watchdog> {
        let calls = Arc::downgrade(&self.calls);
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        Watchdog::spawn(self.timeout, move || {
            let Some(calls) = calls.upgrade() else {
                return;
            };
            let expired = lock(&calls).remove(&callback_id);
            if let Some(call) = expired {
                call.watchdog.disarm();
                info!(%callback_id, timeout_ms, "call timed out");
                let _ = call.waiter.send(Err(BridgeError::Timeout { timeout_ms }));
            }
        })
    }

    /// Remove a call without settling it. Its watchdog is cancelled and its
    /// waiter dropped. Returns whether the call was still pending.
    pub fn rollback(&self, callback_id: &str) -> bool {
        let removed = lock(&self.calls).remove(callback_id);
        match removed {
            Some(call) => {
                call.watchdog.cancel();
                debug!(callback_id, "call rolled back");
                true
            }
            None => false,
        }
    }

    /// Inbound entry point: settle the call `callback_id` with `raw`.
    ///
    /// Unknown, expired, or already-settled ids are logged and ignored.
    pub fn deliver(&self, callback_id: &str, raw: RawResult) {
        let settled = lock(&self.calls).remove(callback_id);
        let Some(PendingCall { waiter, watchdog }) = settled else {
            warn!(callback_id, "[JSBridge] Unknown callback ID");
            return;
        };
        watchdog.cancel();

        let outcome = normalize::interpret(raw);
        match &outcome {
            Ok(_) => debug!(callback_id, "call resolved"),
            Err(e) => debug!(callback_id, error = %e, "call rejected"),
        }
        if waiter.send(outcome).is_err() {
            debug!(callback_id, "caller stopped waiting before settlement");
        }
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn is_pending(&self, callback_id: &str) -> bool {
        lock(&self.calls).contains_key(callback_id)
    }
}
