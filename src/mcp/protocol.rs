//! JSON-RPC 2.0 message types for the stdio session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Requested method is not part of the session surface.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Request line could not be processed.
pub const INTERNAL_ERROR: i32 = -32603;

/// An incoming request or notification.
///
/// Deserialization is deliberately lenient: a missing id becomes `null`, a
/// missing method becomes the empty string (routed as unknown), and the
/// `jsonrpc` version marker is not enforced.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,

    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub params: Value,
}

/// An outgoing response: carries `result` or `error`, never both.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,

    pub id: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcResponse {
    /// Construct a success response with the given result.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Construct an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Serialize to one protocol line, newline excluded.
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"response serialization failed"}}}}"#,
                INTERNAL_ERROR
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_request_parsing() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
        assert_eq!(request.id, json!(7));
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.params, Value::Null);

        let bare: RpcRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(bare.id, Value::Null);
        assert_eq!(bare.method, "");
    }

    #[test]
    fn test_non_object_requests_are_rejected() {
        assert!(serde_json::from_str::<RpcRequest>("42").is_err());
        assert!(serde_json::from_str::<RpcRequest>("\"hello\"").is_err());
    }

    #[test]
    fn test_success_response_has_no_error_field() {
        let line = RpcResponse::success(json!(1), json!({"ok": true})).to_line();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 1);
        assert!(value.get("error").is_none());
        assert_eq!(value["result"]["ok"], true);
    }

    #[test]
    fn test_error_response_has_no_result_field() {
        let line = RpcResponse::error(Value::Null, METHOD_NOT_FOUND, "Method not found").to_line();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert!(value.get("result").is_none());
        assert_eq!(value["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn test_string_ids_are_echoed() {
        let line = RpcResponse::success(json!("req-9"), json!({})).to_line();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["id"], "req-9");
    }
}
