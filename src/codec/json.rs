//! Envelope-in-body JSON codec.
//!
//! The request body itself names the method:
//! `{"method": "Service.Method", "params": {...}, "id": 1}`. Responses echo
//! the request id and always carry both `result` and `error` fields, with
//! the unused one null.

use serde::Deserialize;
use serde_json::{Value, json};

use super::{Codec, EncodedResponse, RequestEnvelope};
use crate::context::RequestContext;
use crate::error::RpcError;

const CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Deserialize)]
struct WireRequest {
    method: String,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

/// Codec for the `{"method", "params", "id"}` request envelope.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn content_type(&self) -> &str {
        CONTENT_TYPE
    }

    fn read_request(
        &self,
        _ctx: &RequestContext,
        body: &[u8],
    ) -> Result<RequestEnvelope, RpcError> {
        let wire: WireRequest =
            serde_json::from_slice(body).map_err(|e| RpcError::Decode(e.to_string()))?;
        if wire.method.is_empty() {
            return Err(RpcError::Decode("empty method name".to_string()));
        }
        Ok(RequestEnvelope {
            method: wire.method,
            params: wire.params.map(unwrap_params),
            id: wire.id,
        })
    }

    fn write_reply(&self, envelope: &RequestEnvelope, reply: &Value) -> EncodedResponse {
        let body = json!({
            "result": reply,
            "error": Value::Null,
            "id": envelope.id,
        });
        EncodedResponse::ok(serde_json::to_vec(&body).unwrap_or_default())
    }

    fn write_error(
        &self,
        envelope: Option<&RequestEnvelope>,
        _zero_reply: Option<&Value>,
        error: &RpcError,
    ) -> EncodedResponse {
        let body = json!({
            "result": Value::Null,
            "error": error.to_string(),
            "id": envelope.and_then(|e| e.id.clone()),
        });
        EncodedResponse::bad_request(serde_json::to_vec(&body).unwrap_or_default())
    }
}

/// Positional params arrive wrapped in a one-element array; unwrap them to
/// the argument value itself. Anything else passes through untouched.
fn unwrap_params(params: Value) -> Value {
    match params {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    }
}
