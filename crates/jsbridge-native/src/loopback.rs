// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process host for desktop/CI builds where no real web view exists.
//
// Plays both sides of the page: it exposes a native object and message
// handlers whose behaviour is supplied as closures, records every request it
// receives, and lets the simulated native side answer through the installed
// global callback via a `Responder`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use jsbridge_core::config::{DEFAULT_BRIDGE_NAME, DEFAULT_CALLBACK_NAME};
use jsbridge_core::error::{BridgeError, Result};
use jsbridge_core::types::{CorrelationId, MessageEnvelope, RawResult};
use serde_json::Value;
use tracing::debug;

use crate::traits::{CallbackSink, HostEnvironment, MessageChannel, NativeObject};

/// User agent of a typical Android web view.
pub const ANDROID_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8 Build/AP1A; wv) \
     AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/124.0.0.0 Mobile Safari/537.36";

/// User agent of a typical iOS WKWebView.
pub const IOS_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148";

/// Handler behind a native-object method: receives `(callbackId, args)`.
pub type MethodHandler = Arc<dyn Fn(&CorrelationId, &[Value]) -> Result<()> + Send + Sync>;

/// Handler behind a message channel: receives each posted envelope.
pub type EnvelopeHandler = Arc<dyn Fn(&MessageEnvelope) -> Result<()> + Send + Sync>;

/// A request that reached the loopback native object.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub callback_id: CorrelationId,
    pub args: Vec<Value>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct HostState {
    user_agent: Mutex<String>,
    object_name: Mutex<String>,
    object: Arc<LoopbackObject>,
    channels: Mutex<HashMap<String, Arc<LoopbackChannel>>>,
    sinks: Mutex<HashMap<String, CallbackSink>>,
    posted: Arc<Mutex<Vec<MessageEnvelope>>>,
}

/// In-process page host. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct LoopbackHost {
    state: Arc<HostState>,
}

impl LoopbackHost {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            state: Arc::new(HostState {
                user_agent: Mutex::new(user_agent.into()),
                object_name: Mutex::new(DEFAULT_BRIDGE_NAME.to_owned()),
                object: Arc::new(LoopbackObject::default()),
                channels: Mutex::new(HashMap::new()),
                sinks: Mutex::new(HashMap::new()),
                posted: Arc::new(Mutex::new(Vec::new())),
            }),
        }
    }

    /// Host that identifies as an Android web view.
    pub fn android() -> Self {
        Self::new(ANDROID_USER_AGENT)
    }

    /// Host that identifies as an iOS web view.
    pub fn ios() -> Self {
        Self::new(IOS_USER_AGENT)
    }

    /// Expose the native object under `name` instead of `JSBridge`.
    pub fn with_bridge_object(self, name: impl Into<String>) -> Self {
        *lock(&self.state.object_name) = name.into();
        self
    }

    /// Expose `name` on the native object.
    pub fn with_method<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CorrelationId, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        lock(&self.state.object.methods).insert(name.into(), Arc::new(handler));
        self
    }

    /// Expose `name` on the native object with a handler that accepts the
    /// call and never answers on its own.
    pub fn with_noop_method(self, name: impl Into<String>) -> Self {
        self.with_method(name, |_, _| Ok(()))
    }

    /// Register a message handler under `name`.
    pub fn with_message_handler<F>(self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&MessageEnvelope) -> Result<()> + Send + Sync + 'static,
    {
        let channel = LoopbackChannel {
            handler: Arc::new(handler),
            posted: Arc::clone(&self.state.posted),
        };
        lock(&self.state.channels).insert(name.into(), Arc::new(channel));
        self
    }

    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        *lock(&self.state.user_agent) = user_agent.into();
    }

    /// Every call the native object received, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.state.object.calls).clone()
    }

    /// Every envelope posted to any message handler, in order.
    pub fn posted(&self) -> Vec<MessageEnvelope> {
        lock(&self.state.posted).clone()
    }

    pub fn has_callback(&self, name: &str) -> bool {
        lock(&self.state.sinks).contains_key(name)
    }

    /// Native-side handle answering through the default global callback.
    pub fn responder(&self) -> Responder {
        self.responder_for(DEFAULT_CALLBACK_NAME)
    }

    /// Native-side handle answering through the global callback `name`.
    pub fn responder_for(&self, name: impl Into<String>) -> Responder {
        Responder {
            state: Arc::downgrade(&self.state),
            callback_name: name.into(),
        }
    }
}

impl HostEnvironment for LoopbackHost {
    fn user_agent(&self) -> String {
        lock(&self.state.user_agent).clone()
    }

    fn native_object(&self, name: &str) -> Option<Arc<dyn NativeObject>> {
        if *lock(&self.state.object_name) == name {
            Some(Arc::clone(&self.state.object) as Arc<dyn NativeObject>)
        } else {
            None
        }
    }

    fn message_channel(&self, name: &str) -> Option<Arc<dyn MessageChannel>> {
        lock(&self.state.channels)
            .get(name)
            .map(|channel| Arc::clone(channel) as Arc<dyn MessageChannel>)
    }

    fn install_callback(&self, name: &str, sink: CallbackSink) -> Result<()> {
        let mut sinks = lock(&self.state.sinks);
        if sinks.contains_key(name) {
            return Err(BridgeError::Host(format!(
                "global callback {name} is already installed"
            )));
        }
        sinks.insert(name.to_owned(), sink);
        debug!(callback = name, "loopback: installed global callback");
        Ok(())
    }

    fn remove_callback(&self, name: &str) {
        if lock(&self.state.sinks).remove(name).is_some() {
            debug!(callback = name, "loopback: removed global callback");
        }
    }
}

/// Simulated native side: calls the page's global callback.
///
/// Holds the host weakly so handlers stored inside the host can capture it.
#[derive(Clone)]
pub struct Responder {
    state: Weak<HostState>,
    callback_name: String,
}

impl Responder {
    /// Call `callbackName(callbackId, raw)`. Returns `false` if the host is
    /// gone or nothing is installed under that name.
    pub fn respond(&self, callback_id: &str, raw: impl Into<RawResult>) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        // Release the lock before calling in; the sink may re-enter the host.
        let sink = lock(&state.sinks).get(&self.callback_name).cloned();
        match sink {
            Some(sink) => {
                sink(callback_id, raw.into());
                true
            }
            None => false,
        }
    }
}

#[derive(Default)]
struct LoopbackObject {
    methods: Mutex<HashMap<String, MethodHandler>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl NativeObject for LoopbackObject {
    fn has_method(&self, name: &str) -> bool {
        lock(&self.methods).contains_key(name)
    }

    fn call(&self, name: &str, callback_id: &CorrelationId, args: &[Value]) -> Result<()> {
        lock(&self.calls).push(RecordedCall {
            method: name.to_owned(),
            callback_id: callback_id.clone(),
            args: args.to_vec(),
        });
        let handler = lock(&self.methods).get(name).cloned();
        match handler {
            Some(handler) => {
                debug!(method = name, %callback_id, "loopback: native call");
                handler(callback_id, args)
            }
            None => Err(BridgeError::Host(format!("JSBridge.{name} is not a function"))),
        }
    }
}

struct LoopbackChannel {
    handler: EnvelopeHandler,
    posted: Arc<Mutex<Vec<MessageEnvelope>>>,
}

impl MessageChannel for LoopbackChannel {
    fn post_message(&self, envelope: MessageEnvelope) -> Result<()> {
        lock(&self.posted).push(envelope.clone());
        debug!(
            funname = %envelope.funname,
            callback_id = %envelope.callback_id,
            "loopback: message posted"
        );
        (self.handler)(&envelope)
    }
}
