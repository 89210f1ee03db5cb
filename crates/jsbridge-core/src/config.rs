// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Name of the native object (Android) and message handler (iOS).
pub const DEFAULT_BRIDGE_NAME: &str = "JSBridge";

/// Name of the global function the native side calls with responses.
pub const DEFAULT_CALLBACK_NAME: &str = "appCallBack";

/// Settings applied uniformly to every call made through one bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// How long a call may stay pending before it fails with a timeout.
    pub timeout_ms: u64,
    /// Native-exposed object whose methods are looked up and invoked.
    pub bridge_object: String,
    /// Message handler that receives iOS envelopes.
    pub message_handler: String,
    /// Global inbound sink installed at construction. Must be distinct per
    /// bridge when several share one page.
    pub callback_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            bridge_object: DEFAULT_BRIDGE_NAME.to_owned(),
            message_handler: DEFAULT_BRIDGE_NAME.to_owned(),
            callback_name: DEFAULT_CALLBACK_NAME.to_owned(),
        }
    }
}

impl BridgeConfig {
    /// Default configuration with a custom timeout.
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse a (possibly partial) JSON configuration. Missing fields take
    /// their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject names the host could not expose.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("bridge_object", &self.bridge_object),
            ("message_handler", &self.message_handler),
            ("callback_name", &self.callback_name),
        ] {
            if value.trim().is_empty() {
                return Err(BridgeError::Config(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_native_conventions() {
        let config = BridgeConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.bridge_object, "JSBridge");
        assert_eq!(config.message_handler, "JSBridge");
        assert_eq!(config.callback_name, "appCallBack");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = BridgeConfig::from_json(r#"{"timeout_ms": 2500}"#).unwrap();
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.callback_name, DEFAULT_CALLBACK_NAME);
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = BridgeConfig::from_json(r#"{"callback_name": " "}"#).unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            BridgeConfig::from_json("{timeout_ms:"),
            Err(BridgeError::Config(_))
        ));
    }
}
