// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge facade: wires the router, the registry, and the global callback.

use std::sync::Arc;

use jsbridge_core::config::BridgeConfig;
use jsbridge_core::error::{BridgeError, Result};
use jsbridge_core::types::{Platform, RawResult};
use jsbridge_native::traits::{CallbackSink, HostEnvironment};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::pending::PendingResponse;
use crate::registry::PendingCallRegistry;
use crate::router::Router;

/// Awaitable native calls from inside a web view.
///
/// Construction installs the global callback named by
/// `BridgeConfig::callback_name` on the host; dropping the bridge removes it
/// and fails every outstanding call with `BridgeError::Shutdown`.
pub struct JsBridge {
    registry: Arc<PendingCallRegistry>,
    router: Router,
    host: Arc<dyn HostEnvironment>,
    config: BridgeConfig,
}

impl JsBridge {
    pub fn new(host: Arc<dyn HostEnvironment>, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        let registry = Arc::new(PendingCallRegistry::new(config.timeout()));

        // The host keeps the sink for as long as it likes; it must not keep
        // the registry alive.
        let sink_registry = Arc::downgrade(&registry);
        let sink: CallbackSink = Arc::new(move |callback_id: &str, raw: RawResult| {
            match sink_registry.upgrade() {
                Some(registry) => registry.deliver(callback_id, raw),
                None => warn!(callback_id, "[JSBridge] response arrived after shutdown"),
            }
        });
        host.install_callback(&config.callback_name, sink)?;

        info!(
            callback = %config.callback_name,
            timeout_ms = config.timeout_ms,
            "bridge ready"
        );
        Ok(Self {
            router: Router::new(Arc::clone(&host), &config),
            registry,
            host,
            config,
        })
    }

    /// Bridge with the default names and a 10 s timeout.
    pub fn with_defaults(host: Arc<dyn HostEnvironment>) -> Result<Self> {
        Self::new(host, BridgeConfig::default())
    }

    /// Call native method `name` and decode the response `data` as `T`.
    ///
    /// Never blocks: the request is registered and handed to the transport
    /// before this returns. Precondition and transport failures are reported
    /// through the returned future.
    pub fn invoke<T: DeserializeOwned>(&self, name: &str, args: Vec<Value>) -> PendingResponse<T> {
        let platform = self.router.platform();

        if !self.router.has_method(name) {
            warn!(method = name, %platform, "native method not found");
            return PendingResponse::failed(BridgeError::MethodNotFound(name.to_owned()));
        }

        let (callback_id, receiver) = match self.registry.register() {
            Ok(registered) => registered,
            Err(e) => return PendingResponse::failed(e),
        };
        debug!(method = name, %platform, %callback_id, "invoking native method");

        if let Err(e) = self.router.dispatch(platform, name, &callback_id, args) {
            // An answer delivered during dispatch already settled the call.
            if !self.registry.rollback(callback_id.as_str()) {
                debug!(method = name, %callback_id, error = %e, "dispatch failed after settlement");
                return PendingResponse::waiting(callback_id, receiver);
            }
            warn!(method = name, %platform, %callback_id, error = %e, "dispatch failed");
            return PendingResponse::failed(e);
        }

        PendingResponse::waiting(callback_id, receiver)
    }

    /// `invoke` without decoding: resolves with the raw `data` value.
    pub fn invoke_raw(&self, name: &str, args: Vec<Value>) -> PendingResponse<Value> {
        self.invoke(name, args)
    }

    /// Inbound entry point, equivalent to the native side calling the global
    /// callback.
    pub fn deliver(&self, callback_id: &str, raw: impl Into<RawResult>) {
        self.registry.deliver(callback_id, raw.into());
    }

    pub fn platform(&self) -> Platform {
        self.router.platform()
    }

    pub fn pending_count(&self) -> usize {
        self.registry.pending_count()
    }

    pub fn is_pending(&self, callback_id: &str) -> bool {
        self.registry.is_pending(callback_id)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl Drop for JsBridge {
    fn drop(&mut self) {
        self.host.remove_callback(&self.config.callback_name);
        let pending = self.registry.pending_count();
        if pending > 0 {
            info!(pending, "bridge dropped with calls in flight");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbridge_native::LoopbackHost;
    use serde_json::json;

    #[tokio::test]
    async fn construction_installs_callback() {
        let host = LoopbackHost::android();
        let bridge = JsBridge::with_defaults(Arc::new(host.clone())).unwrap();
        assert!(host.has_callback("appCallBack"));

        drop(bridge);
        assert!(!host.has_callback("appCallBack"));
    }

    #[tokio::test]
    async fn second_bridge_needs_its_own_callback_name() {
        let host = LoopbackHost::android();
        let _first = JsBridge::with_defaults(Arc::new(host.clone())).unwrap();

        let clash = JsBridge::with_defaults(Arc::new(host.clone()));
        assert!(matches!(clash, Err(BridgeError::Host(_))));

        let config = BridgeConfig {
            callback_name: "appCallBack2".into(),
            ..BridgeConfig::default()
        };
        assert!(JsBridge::new(Arc::new(host.clone()), config).is_ok());
    }

    #[tokio::test]
    async fn invalid_config_is_refused() {
        let config = BridgeConfig {
            bridge_object: String::new(),
            ..BridgeConfig::default()
        };
        let result = JsBridge::new(Arc::new(LoopbackHost::android()), config);
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[tokio::test]
    async fn missing_method_allocates_nothing() {
        let host = LoopbackHost::android();
        let bridge = JsBridge::with_defaults(Arc::new(host.clone())).unwrap();

        let call = bridge.invoke_raw("getUserInfo", vec![]);
        assert!(call.callback_id().is_none());
        assert_eq!(bridge.pending_count(), 0);
        assert!(matches!(call.await, Err(BridgeError::MethodNotFound(m)) if m == "getUserInfo"));
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn deliver_accepts_strings_and_values() {
        let host = LoopbackHost::android().with_noop_method("ping");
        let bridge = JsBridge::with_defaults(Arc::new(host)).unwrap();

        let first = bridge.invoke_raw("ping", vec![]);
        let second = bridge.invoke_raw("ping", vec![]);
        let first_id = first.callback_id().cloned().unwrap();
        let second_id = second.callback_id().cloned().unwrap();

        bridge.deliver(first_id.as_str(), r#"{"code":200,"data":"pong"}"#);
        bridge.deliver(second_id.as_str(), json!({"code": 200, "data": "pong"}));
        assert_eq!(first.await.unwrap(), json!("pong"));
        assert_eq!(second.await.unwrap(), json!("pong"));
    }
}
