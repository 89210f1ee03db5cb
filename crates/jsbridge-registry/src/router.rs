// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform routing.
//
// Android pages carry the native object directly, so requests are method
// calls on it. iOS pages only get a WebKit message handler, so requests are
// posted as envelopes. Anything else is refused.

use std::sync::Arc;

use jsbridge_core::config::BridgeConfig;
use jsbridge_core::error::{BridgeError, Result};
use jsbridge_core::types::{CorrelationId, MessageEnvelope, Platform};
use jsbridge_native::traits::HostEnvironment;
use serde_json::Value;

/// Picks and drives the transport for each call.
pub struct Router {
    host: Arc<dyn HostEnvironment>,
    bridge_object: String,
    message_handler: String,
}

impl Router {
    pub fn new(host: Arc<dyn HostEnvironment>, config: &BridgeConfig) -> Self {
        Self {
            host,
            bridge_object: config.bridge_object.clone(),
            message_handler: config.message_handler.clone(),
        }
    }

    /// Classify the host from its current user agent. Not cached.
    pub fn platform(&self) -> Platform {
        Platform::classify(&self.host.user_agent())
    }

    /// Whether the native object exposes a callable `name`.
    pub fn has_method(&self, name: &str) -> bool {
        self.host
            .native_object(&self.bridge_object)
            .is_some_and(|object| object.has_method(name))
    }

    /// Hand the request to the platform transport.
    ///
    /// Transport failures come back as `BridgeError::Invoke`; an unsupported
    /// platform as `BridgeError::PlatformNotSupported` without touching any
    /// transport.
    pub fn dispatch(
        &self,
        platform: Platform,
        name: &str,
        callback_id: &CorrelationId,
        args: Vec<Value>,
    ) -> Result<()> {
        match platform {
            Platform::Android => {
                let object = self.host.native_object(&self.bridge_object).ok_or_else(|| {
                    BridgeError::Invoke(format!("{} is not exposed", self.bridge_object))
                })?;
                object.call(name, callback_id, &args).map_err(transport_error)
            }
            Platform::Ios => {
                let channel = self
                    .host
                    .message_channel(&self.message_handler)
                    .ok_or_else(|| {
                        BridgeError::Invoke(format!(
                            "message handler {} is not registered",
                            self.message_handler
                        ))
                    })?;
                channel
                    .post_message(MessageEnvelope {
                        funname: name.to_owned(),
                        args,
                        callback_id: callback_id.clone(),
                    })
                    .map_err(transport_error)
            }
            Platform::Unknown => Err(BridgeError::PlatformNotSupported(platform)),
        }
    }
}

fn transport_error(err: BridgeError) -> BridgeError {
    match err {
        BridgeError::Invoke(_) => err,
        BridgeError::Host(detail) => BridgeError::Invoke(detail),
        other => BridgeError::Invoke(other.to_string()),
    }
}
