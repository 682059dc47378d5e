//! Path-routed JSON codec.
//!
//! The method name is the last segment of the request path and the body is
//! the bare argument object. Successful replies are the serialized result
//! with no wrapper; errors are reported inside the result object itself
//! through an `error_message` field, with the result fields zero-valued.

use serde_json::{Map, Value};

use super::{Codec, EncodedResponse, RequestEnvelope};
use crate::context::RequestContext;
use crate::error::RpcError;

const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const ERROR_FIELD: &str = "error_message";

/// Codec routing by URI path, with bare-argument bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProtoCodec;

impl ProtoCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for ProtoCodec {
    fn content_type(&self) -> &str {
        CONTENT_TYPE
    }

    fn read_request(
        &self,
        ctx: &RequestContext,
        body: &[u8],
    ) -> Result<RequestEnvelope, RpcError> {
        let method = ctx.path_method().ok_or_else(|| {
            RpcError::Decode(format!("no method in request path {:?}", ctx.uri().path()))
        })?;
        // A JSON `null` body decodes to an absent payload, which fails later
        // at argument decoding rather than here.
        let params: Option<Value> =
            serde_json::from_slice(body).map_err(|e| RpcError::Decode(e.to_string()))?;
        Ok(RequestEnvelope {
            method: method.to_string(),
            params,
            id: None,
        })
    }

    fn write_reply(&self, _envelope: &RequestEnvelope, reply: &Value) -> EncodedResponse {
        EncodedResponse::ok(serde_json::to_vec(reply).unwrap_or_default())
    }

    fn write_error(
        &self,
        _envelope: Option<&RequestEnvelope>,
        zero_reply: Option<&Value>,
        error: &RpcError,
    ) -> EncodedResponse {
        let mut fields = match zero_reply {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        fields.insert(ERROR_FIELD.to_string(), Value::String(error.to_string()));
        EncodedResponse::bad_request(serde_json::to_vec(&Value::Object(fields)).unwrap_or_default())
    }
}
