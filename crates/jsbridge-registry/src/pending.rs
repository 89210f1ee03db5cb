// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-side handle for an in-flight call.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use jsbridge_core::error::{BridgeError, Result};
use jsbridge_core::types::CorrelationId;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;

/// Outcome sent from the registry to the waiting caller.
pub type Outcome = Result<Value>;

enum State {
    /// Failed before anything was registered (or after a rollback).
    Failed(Option<BridgeError>),
    Waiting(oneshot::Receiver<Outcome>),
    Done,
}

/// Future returned by `JsBridge::invoke`.
///
/// Created synchronously: by the time a caller holds one, the request has
/// already been handed to the transport (or has already failed). Resolves to
/// the response `data` decoded as `T`.
#[must_use = "a pending response does nothing unless awaited"]
pub struct PendingResponse<T> {
    callback_id: Option<CorrelationId>,
    state: State,
    _response: PhantomData<fn() -> T>,
}

impl<T> PendingResponse<T> {
    pub(crate) fn failed(err: BridgeError) -> Self {
        Self {
            callback_id: None,
            state: State::Failed(Some(err)),
            _response: PhantomData,
        }
    }

    pub(crate) fn waiting(callback_id: CorrelationId, receiver: oneshot::Receiver<Outcome>) -> Self {
        Self {
            callback_id: Some(callback_id),
            state: State::Waiting(receiver),
            _response: PhantomData,
        }
    }

    /// Correlation id of the call, if it got far enough to be assigned one.
    pub fn callback_id(&self) -> Option<&CorrelationId> {
        self.callback_id.as_ref()
    }
}

impl<T: DeserializeOwned> Future for PendingResponse<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let outcome = match &mut this.state {
            State::Failed(err) => Err(err.take().unwrap_or(BridgeError::Shutdown)),
            State::Waiting(receiver) => match Pin::new(receiver).poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(outcome)) => outcome,
                // Sender dropped without settling: the registry went away.
                Poll::Ready(Err(_)) => Err(BridgeError::Shutdown),
            },
            State::Done => panic!("PendingResponse polled after completion"),
        };
        this.state = State::Done;
        Poll::Ready(outcome.and_then(|data| {
            serde_json::from_value(data).map_err(|e| BridgeError::Parse(e.to_string()))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct UserInfo {
        name: String,
    }

    #[tokio::test]
    async fn decodes_into_requested_type() {
        let (tx, rx) = oneshot::channel();
        let pending = PendingResponse::<UserInfo>::waiting(CorrelationId::new("a_1"), rx);
        tx.send(Ok(json!({"name": "a"}))).unwrap();
        assert_eq!(pending.await.unwrap(), UserInfo { name: "a".into() });
    }

    #[tokio::test]
    async fn shape_mismatch_is_parse_error() {
        let (tx, rx) = oneshot::channel();
        let pending = PendingResponse::<UserInfo>::waiting(CorrelationId::new("a_2"), rx);
        tx.send(Ok(json!(1))).unwrap();
        assert!(matches!(pending.await, Err(BridgeError::Parse(_))));
    }

    #[tokio::test]
    async fn dropped_sender_is_shutdown() {
        let (tx, rx) = oneshot::channel::<Outcome>();
        let pending = PendingResponse::<Value>::waiting(CorrelationId::new("a_3"), rx);
        drop(tx);
        assert!(matches!(pending.await, Err(BridgeError::Shutdown)));
    }

    #[tokio::test]
    async fn failed_response_has_no_id() {
        let pending = PendingResponse::<Value>::failed(BridgeError::MethodNotFound("x".into()));
        assert!(pending.callback_id().is_none());
        assert!(matches!(pending.await, Err(BridgeError::MethodNotFound(_))));
    }
}
