// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Response normalization.
//
// The native side answers with either a `{ code, message?, data }` object or
// a string holding that object as JSON. Decode failures become `Parse` errors
// for the one pending call; malformed shapes still settle (as rejections).

use jsbridge_core::error::{BridgeError, Result};
use jsbridge_core::types::{RawResult, StructuredResponse};
use serde_json::Value;

/// Coerce a raw inbound payload into a `StructuredResponse`.
pub fn normalize(raw: RawResult) -> Result<StructuredResponse> {
    let value = match raw {
        RawResult::Object(value) => value,
        RawResult::Text(text) => {
            serde_json::from_str(&text).map_err(|e| BridgeError::Parse(e.to_string()))?
        }
    };
    Ok(structure(value))
}

/// Pick `code`, `message`, and `data` out of whatever was decoded.
///
/// Missing or mistyped fields are left empty; a non-object value yields a
/// response with no code at all.
pub fn structure(value: Value) -> StructuredResponse {
    let Value::Object(mut fields) = value else {
        return StructuredResponse::default();
    };
    StructuredResponse {
        code: fields.get("code").and_then(status_code),
        message: fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned),
        data: fields.remove("data").unwrap_or(Value::Null),
    }
}

/// Integral status code. `200.0` counts; `"200"` does not.
fn status_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Resolve with `data` on exactly 200; reject everything else.
///
/// Codes in (200, 400) and a missing code take the same path as >= 400.
pub fn settle(response: StructuredResponse) -> Result<Value> {
    if response.is_success() {
        Ok(response.data)
    } else {
        Err(BridgeError::application(
            response.code,
            response.message.as_deref(),
        ))
    }
}

/// `normalize` then `settle`.
pub fn interpret(raw: RawResult) -> Result<Value> {
    normalize(raw).and_then(settle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsbridge_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn object_success_resolves_data() {
        let raw = RawResult::Object(json!({"code": 200, "data": {"name": "a"}}));
        assert_eq!(interpret(raw).unwrap(), json!({"name": "a"}));
    }

    #[test]
    fn string_payload_is_decoded() {
        let raw = RawResult::from(r#"{"code":200,"data":1}"#);
        assert_eq!(interpret(raw).unwrap(), json!(1));
    }

    #[test]
    fn undecodable_string_is_parse_error() {
        let err = interpret(RawResult::from("{code: 200")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn error_code_uses_native_message() {
        let raw = RawResult::Object(json!({"code": 403, "message": "denied"}));
        let err = interpret(raw).unwrap_err();
        assert_eq!(err.to_string(), "denied");
        assert!(matches!(err, BridgeError::Application { code: Some(403), .. }));
    }

    #[test]
    fn only_exact_200_succeeds() {
        for code in [201, 204, 302, 399] {
            let err = interpret(RawResult::Object(json!({"code": code, "data": 1}))).unwrap_err();
            assert_eq!(err.to_string(), format!("Error code {code}"));
        }
        assert!(interpret(RawResult::Object(json!({"code": 200.0, "data": 1}))).is_ok());
    }

    #[test]
    fn missing_or_mistyped_code_rejects() {
        let err = interpret(RawResult::Object(json!({"data": 1}))).unwrap_err();
        assert!(matches!(err, BridgeError::Application { code: None, .. }));

        let err = interpret(RawResult::Object(json!({"code": "200"}))).unwrap_err();
        assert!(matches!(err, BridgeError::Application { code: None, .. }));
    }

    #[test]
    fn non_object_values_reject() {
        assert!(interpret(RawResult::from("5")).is_err());
        assert!(interpret(RawResult::Object(Value::Null)).is_err());
        assert_eq!(structure(json!([1, 2])), StructuredResponse::default());
    }

    #[test]
    fn absent_data_is_null() {
        let response = structure(json!({"code": 200}));
        assert_eq!(response, StructuredResponse::ok(Value::Null));
    }
}
