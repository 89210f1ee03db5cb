// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the JSBridge correlation layer.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code the native side sends for a successful call. Only this exact
/// value resolves a call.
pub const SUCCESS_CODE: i64 = 200;

/// Opaque token linking a request to its eventual response.
///
/// Unique per outstanding call within one process. Generated by the
/// registry; the native side only ever echoes it back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CorrelationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mobile platform hosting the web view, as sniffed from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Native object exposed directly on the page; methods are called in place.
    Android,
    /// WebKit message handler; requests are posted as envelopes.
    Ios,
    Unknown,
}

impl Platform {
    /// Classify a user-agent string.
    ///
    /// Android wins over iOS; an iOS match is discarded for Windows Phone
    /// agents, which also advertise "iPhone".
    pub fn classify(user_agent: &str) -> Self {
        if is_android(user_agent) {
            Self::Android
        } else if is_ios(user_agent) {
            Self::Ios
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the user agent identifies an Android web view.
pub fn is_android(user_agent: &str) -> bool {
    let lower = user_agent.to_ascii_lowercase();
    lower.contains("android") || lower.contains("adr")
}

/// Whether the user agent identifies an iOS web view.
pub fn is_ios(user_agent: &str) -> bool {
    let lower = user_agent.to_ascii_lowercase();
    (lower.contains("iphone") || lower.contains("ipad") || lower.contains("ipod"))
        && !lower.contains("windows phone")
}

/// Raw inbound payload handed to the global callback by the native side.
///
/// Native code either passes a structured object or a JSON-encoded string;
/// the normalizer decides which applies.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// String payload that must be decoded before use.
    Text(String),
    /// Already-structured value.
    Object(Value),
}

impl From<Value> for RawResult {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Object(other),
        }
    }
}

impl From<String> for RawResult {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawResult {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Response shape `{ code, message?, data }` after normalization.
///
/// Fields are kept optional so a malformed response still settles the call
/// (as a rejection) instead of being dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StructuredResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl StructuredResponse {
    /// Successful response carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            code: Some(SUCCESS_CODE),
            message: None,
            data,
        }
    }

    /// Error response with a status code and message.
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
            data: Value::Null,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }
}

/// Request envelope posted to the iOS message handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub funname: String,
    pub args: Vec<Value>,
    #[serde(rename = "callbackId")]
    pub callback_id: CorrelationId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15";
    const WINDOWS_PHONE_UA: &str =
        "Mozilla/5.0 (Windows Phone 10.0; Lumia 950) like iPhone OS 7_0_3 Mac OS X";

    #[test]
    fn classifies_android() {
        assert_eq!(Platform::classify(ANDROID_UA), Platform::Android);
        assert_eq!(Platform::classify("UCWEB/2.0 (Linux; U; Adr 4.0.3)"), Platform::Android);
    }

    #[test]
    fn classifies_ios_devices() {
        assert_eq!(Platform::classify(IPHONE_UA), Platform::Ios);
        assert_eq!(Platform::classify("Mozilla/5.0 (iPad; CPU OS 16_0)"), Platform::Ios);
        assert_eq!(Platform::classify("Mozilla/5.0 (iPod touch)"), Platform::Ios);
    }

    #[test]
    fn windows_phone_is_not_ios() {
        assert_eq!(Platform::classify(WINDOWS_PHONE_UA), Platform::Unknown);
    }

    #[test]
    fn desktop_is_unknown() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
        assert_eq!(Platform::classify(ua), Platform::Unknown);
    }

    #[test]
    fn string_values_become_text() {
        assert_eq!(
            RawResult::from(json!("{\"code\":200}")),
            RawResult::Text("{\"code\":200}".into())
        );
        assert!(matches!(RawResult::from(json!({"code": 200})), RawResult::Object(_)));
    }

    #[test]
    fn envelope_uses_wire_field_names() {
        let envelope = MessageEnvelope {
            funname: "getUserInfo".into(),
            args: vec![json!(1)],
            callback_id: CorrelationId::new("abc_123"),
        };
        let wire = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            wire,
            json!({"funname": "getUserInfo", "args": [1], "callbackId": "abc_123"})
        );
    }
}
