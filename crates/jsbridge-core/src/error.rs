// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for JSBridge.

use thiserror::Error;

use crate::types::Platform;

/// Top-level error type for all bridge operations.
///
/// Every failure is delivered to the one caller whose call produced it;
/// nothing here is fatal to the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Preconditions --
    #[error("[JSBridge] Method {0} not exists")]
    MethodNotFound(String),

    #[error("[JSBridge] Platform {0} not supported")]
    PlatformNotSupported(Platform),

    // -- Transport --
    #[error("[JSBridge] Invoke error: {0}")]
    Invoke(String),

    #[error("[JSBridge] Timeout ({timeout_ms}ms)")]
    Timeout { timeout_ms: u64 },

    // -- Inbound delivery --
    #[error("[JSBridge] Parse error: {0}")]
    Parse(String),

    /// Non-200 status reported by the native side. Displays the native
    /// message verbatim.
    #[error("{message}")]
    Application { code: Option<i64>, message: String },

    // -- Lifecycle / environment --
    #[error("[JSBridge] bridge shut down before the call settled")]
    Shutdown,

    #[error("[JSBridge] host environment error: {0}")]
    Host(String),

    #[error("[JSBridge] invalid configuration: {0}")]
    Config(String),
}

/// Fieldless mirror of [`BridgeError`] for matching and structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MethodNotFound,
    PlatformNotSupported,
    Invoke,
    Timeout,
    Parse,
    Application,
    Shutdown,
    Host,
    Config,
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MethodNotFound(_) => ErrorKind::MethodNotFound,
            Self::PlatformNotSupported(_) => ErrorKind::PlatformNotSupported,
            Self::Invoke(_) => ErrorKind::Invoke,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Application { .. } => ErrorKind::Application,
            Self::Shutdown => ErrorKind::Shutdown,
            Self::Host(_) => ErrorKind::Host,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Build an application error, falling back to `Error code N` when the
    /// native side sent no (or an empty) message.
    pub fn application(code: Option<i64>, message: Option<&str>) -> Self {
        let message = match message.filter(|m| !m.is_empty()) {
            Some(m) => m.to_owned(),
            None => match code {
                Some(code) => format!("Error code {code}"),
                None => "Error code missing".to_owned(),
            },
        };
        Self::Application { code, message }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_prefers_native_message() {
        let err = BridgeError::application(Some(403), Some("denied"));
        assert_eq!(err.to_string(), "denied");
        assert_eq!(err.kind(), ErrorKind::Application);
    }

    #[test]
    fn application_error_falls_back_to_code() {
        let err = BridgeError::application(Some(500), None);
        assert_eq!(err.to_string(), "Error code 500");

        let err = BridgeError::application(Some(404), Some(""));
        assert_eq!(err.to_string(), "Error code 404");
    }

    #[test]
    fn missing_code_has_its_own_fallback() {
        let err = BridgeError::application(None, None);
        assert_eq!(err.to_string(), "Error code missing");
    }

    #[test]
    fn timeout_message_carries_duration() {
        let err = BridgeError::Timeout { timeout_ms: 10_000 };
        assert_eq!(err.to_string(), "[JSBridge] Timeout (10000ms)");
    }
}
