// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSBridge Registry — turns the callback-based native channel into awaitable
// request/response calls.
//
// `JsBridge` is the entry point: it routes each call to the platform
// transport, parks a waiter in the `PendingCallRegistry` under a fresh
// correlation id, and settles that waiter exactly once when the native side
// answers through the global callback or the watchdog fires.

pub mod bridge;
pub mod correlation;
pub mod normalize;
pub mod pending;
pub mod registry;
pub mod router;
pub mod watchdog;

pub use bridge::JsBridge;
pub use pending::PendingResponse;
pub use registry::PendingCallRegistry;
pub use router::Router;

// Re-exported for `bridge_args!`.
pub use serde_json;

/// Build an argument list from any `Serialize` values.
///
/// ```ignore
/// bridge.invoke::<UserInfo>("getUserInfo", bridge_args!["profile", 42]);
/// ```
#[macro_export]
macro_rules! bridge_args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($arg)),+]
    };
}
