//! Wire codecs: translate between HTTP bodies and method envelopes.
//!
//! A codec owns the wire shape for one content type: how the method name and
//! argument payload are read out of a request, and how replies and error
//! envelopes are written back. Codecs are selected per request by the
//! dispatcher from the request's Content-Type.

mod json;
mod proto;

pub use json::JsonCodec;
pub use proto::ProtoCodec;

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;

use crate::context::RequestContext;
use crate::error::RpcError;

/// Decoded request envelope: the method to invoke plus its raw argument
/// payload, not yet bound to a concrete argument type.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    /// Dotted `Service.Method` name.
    pub method: String,
    /// Raw argument payload; `None` when the request carried none.
    pub params: Option<Value>,
    /// Correlation id, echoed back by codecs whose envelope carries one.
    pub id: Option<Value>,
}

/// Encoded response body plus the HTTP status it should be written with.
#[derive(Debug, Clone)]
pub struct EncodedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl EncodedResponse {
    pub(crate) fn ok(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    pub(crate) fn bad_request(body: Vec<u8>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: body.into(),
        }
    }
}

/// Translates between wire bytes and method envelopes for one content type.
///
/// Codecs are stateless and safe to invoke concurrently; each call stands
/// alone and must not touch shared state.
pub trait Codec: Send + Sync {
    /// Canonical Content-Type written on responses, charset suffix included.
    fn content_type(&self) -> &str;

    /// Parse an incoming request into a method name and argument payload.
    ///
    /// Fails with [`RpcError::Decode`] when the body is absent, malformed,
    /// or names no method.
    fn read_request(
        &self,
        ctx: &RequestContext,
        body: &[u8],
    ) -> Result<RequestEnvelope, RpcError>;

    /// Encode a successful reply. Always status 200.
    fn write_reply(&self, envelope: &RequestEnvelope, reply: &Value) -> EncodedResponse;

    /// Encode a failure. Always status 400: once a codec has been selected,
    /// application-level errors and transport-level ones share a status and
    /// differ only by message.
    ///
    /// `envelope` is absent when decoding itself failed. `zero_reply` is the
    /// zero-valued result, supplied for codecs whose error shape carries the
    /// result fields.
    fn write_error(
        &self,
        envelope: Option<&RequestEnvelope>,
        zero_reply: Option<&Value>,
        error: &RpcError,
    ) -> EncodedResponse;
}
