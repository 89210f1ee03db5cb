// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Simulated native side.
//
// Each exposed method answers asynchronously on the tokio runtime, the way a
// real WebView answers from the UI thread some time after the call.

use std::time::Duration;

use jsbridge_core::types::{CorrelationId, MessageEnvelope};
use jsbridge_native::{LoopbackHost, Responder};
use serde_json::{Value, json};
use tracing::debug;

/// Method names the simulated native side understands.
pub const METHODS: &[&str] = &[
    "getUserInfo",
    "getLocation",
    "deleteAccount",
    "getVersion",
    "neverAnswers",
];

/// Build the answer the native side would give for `method`.
///
/// `None` means the native side never calls back.
pub fn answer(method: &str, args: &[Value]) -> Option<Value> {
    match method {
        "getUserInfo" => Some(json!({"code": 200, "data": {"name": "a", "id": 42}})),
        // Some native code returns JSON-encoded strings instead of objects.
        "getLocation" => Some(Value::String(
            json!({"code": 200, "data": {"lat": 52.52, "lng": 13.405}}).to_string(),
        )),
        "deleteAccount" => Some(json!({"code": 403, "message": "denied"})),
        "getVersion" => {
            let channel = args.first().and_then(Value::as_str).unwrap_or("stable");
            Some(json!({"code": 200, "data": format!("3.2.1-{channel}")}))
        }
        _ => None,
    }
}

fn schedule(responder: &Responder, callback_id: &CorrelationId, method: &str, args: &[Value]) {
    let Some(reply) = answer(method, args) else {
        debug!(method, %callback_id, "native: dropping call on the floor");
        return;
    };
    let responder = responder.clone();
    let callback_id = callback_id.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(25)).await;
        responder.respond(callback_id.as_str(), reply);
    });
}

/// Android-style host: methods live on the native object.
pub fn android_host() -> LoopbackHost {
    let host = LoopbackHost::android();
    let responder = host.responder();
    METHODS.iter().fold(host, |host, &method| {
        let responder = responder.clone();
        host.with_method(method, move |callback_id, args| {
            schedule(&responder, callback_id, method, args);
            Ok(())
        })
    })
}

/// iOS-style host: requests arrive as envelopes on the message handler.
///
/// The native object still has to advertise each method, since callers
/// check it before routing.
pub fn ios_host(handler_name: &str) -> LoopbackHost {
    let host = METHODS
        .iter()
        .fold(LoopbackHost::ios(), |host, &method| host.with_noop_method(method));
    let responder = host.responder();
    host.with_message_handler(handler_name, move |envelope: &MessageEnvelope| {
        schedule(&responder, &envelope.callback_id, &envelope.funname, &envelope.args);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_follow_wire_shape() {
        assert_eq!(answer("getUserInfo", &[]).unwrap()["code"], json!(200));
        assert!(answer("getLocation", &[]).is_some_and(|v| v.is_string()));
        assert_eq!(answer("deleteAccount", &[]).unwrap()["code"], json!(403));
        assert_eq!(
            answer("getVersion", &[json!("beta")]).unwrap()["data"],
            json!("3.2.1-beta")
        );
        assert!(answer("neverAnswers", &[]).is_none());
    }
}
