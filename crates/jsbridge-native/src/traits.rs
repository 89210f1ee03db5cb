// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the web view host.
//
// Implementations wrap whatever the embedding exposes (a JNI-backed
// `addJavascriptInterface` object, a `WKScriptMessageHandler`, a test double).
// Transport methods return as soon as the request has been handed over; the
// response always arrives later through the installed `CallbackSink`.

use std::sync::Arc;

use jsbridge_core::error::Result;
use jsbridge_core::types::{CorrelationId, MessageEnvelope, RawResult};
use serde_json::Value;

/// The global inbound entry point: `(callbackId, rawResult)`.
pub type CallbackSink = Arc<dyn Fn(&str, RawResult) + Send + Sync>;

/// Native object exposed on the page (Android `window.JSBridge`).
pub trait NativeObject: Send + Sync {
    /// Whether `name` is present and callable on this object.
    fn has_method(&self, name: &str) -> bool;

    /// Invoke `name(callbackId, ...args)`. An `Err` means the call itself
    /// failed synchronously; it says nothing about the eventual response.
    fn call(&self, name: &str, callback_id: &CorrelationId, args: &[Value]) -> Result<()>;
}

/// Named message handler (iOS `window.webkit.messageHandlers.<name>`).
pub trait MessageChannel: Send + Sync {
    /// `postMessage({ funname, args, callbackId })`.
    fn post_message(&self, envelope: MessageEnvelope) -> Result<()>;
}

/// Everything the bridge needs from the page it runs in.
pub trait HostEnvironment: Send + Sync {
    /// Identifying string of the runtime (the navigator user agent).
    fn user_agent(&self) -> String;

    /// Look up a native-exposed object by name.
    fn native_object(&self, name: &str) -> Option<Arc<dyn NativeObject>>;

    /// Look up a message handler by name.
    fn message_channel(&self, name: &str) -> Option<Arc<dyn MessageChannel>>;

    /// Expose `sink` as the global function `name`.
    fn install_callback(&self, name: &str, sink: CallbackSink) -> Result<()>;

    /// Remove a previously installed global function. Unknown names are
    /// ignored.
    fn remove_callback(&self, name: &str);
}
