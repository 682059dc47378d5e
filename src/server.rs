//! The HTTP-facing dispatcher: codec selection, method resolution,
//! invocation, and response writing.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response, header};

use crate::codec::{Codec, EncodedResponse};
use crate::context::RequestContext;
use crate::error::{MethodError, RegistrationError, RpcError};
use crate::registry::ServiceMap;
use crate::service::{MethodOutcome, Service};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const FALLBACK_CONTENT_TYPE: &str = "application/json";

/// RPC server core: a codec table plus a service registry.
///
/// Register codecs and services first, then share the server (typically
/// behind an `Arc`) with the HTTP transport. [`Server::handle`] takes
/// `&self`, so all registration completes before serving starts.
pub struct Server {
    codecs: HashMap<String, Arc<dyn Codec>>,
    services: ServiceMap,
}

impl Server {
    pub fn new() -> Self {
        Self {
            codecs: HashMap::new(),
            services: ServiceMap::new(),
        }
    }

    /// Register `codec` for requests whose Content-Type media type equals
    /// `content_type` (parameters ignored, case-insensitive). Registering
    /// the same content type again replaces the earlier codec.
    pub fn register_codec(&mut self, codec: impl Codec + 'static, content_type: impl AsRef<str>) {
        let key = media_type(content_type.as_ref());
        tracing::debug!(content_type = %key, "codec registered");
        self.codecs.insert(key, Arc::new(codec));
    }

    /// Register a service under its own name. Duplicate names and services
    /// with no methods are rejected.
    pub fn register_service(&mut self, service: Service) -> Result<(), RegistrationError> {
        self.services.register(service)
    }

    /// Whether `full` (`Service.Method`) is routable. Diagnostic lookup
    /// with no side effects.
    pub fn has_method(&self, full: &str) -> bool {
        self.services.has_method(full)
    }

    /// Every routable `Service.Method` name, unordered.
    pub fn method_names(&self) -> Vec<String> {
        self.services.method_names()
    }

    /// Dispatch one request and produce its one response.
    ///
    /// Every failure path short-circuits to a single response write; no step
    /// after a failed one executes and nothing is retried at this layer.
    pub fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let (parts, body) = request.into_parts();

        if parts.method != Method::POST {
            tracing::warn!(method = %parts.method, "rejecting non-POST request");
            let err = RpcError::MethodRequired(parts.method.to_string());
            return plain_response(&err);
        }

        let ctx = RequestContext::new(parts.method, parts.uri, parts.headers);
        let codec = match self.select_codec(&ctx) {
            Ok(codec) => codec,
            Err(err) => {
                tracing::warn!(content_type = %ctx.media_type(), "no codec for content type");
                return plain_response(&err);
            }
        };

        let encoded = self.dispatch(codec.as_ref(), &ctx, &body);
        rpc_response(codec.content_type(), encoded)
    }

    /// Match the request's media type against registered codecs. An absent
    /// Content-Type falls back to the codec when exactly one is registered.
    fn select_codec(&self, ctx: &RequestContext) -> Result<Arc<dyn Codec>, RpcError> {
        let media = ctx.media_type();
        if media.is_empty()
            && self.codecs.len() == 1
            && let Some(codec) = self.codecs.values().next()
        {
            return Ok(Arc::clone(codec));
        }
        self.codecs
            .get(&media)
            .cloned()
            .ok_or(RpcError::UnsupportedContentType(media))
    }

    /// Everything after codec selection. Failures from here on are encoded
    /// through the selected codec's error envelope.
    fn dispatch(&self, codec: &dyn Codec, ctx: &RequestContext, body: &[u8]) -> EncodedResponse {
        let envelope = match codec.read_request(ctx, body) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::debug!(error = %err, "request decode failed");
                return codec.write_error(None, None, &err);
            }
        };

        let Some(handle) = self.services.resolve(&envelope.method) else {
            tracing::warn!(method = %envelope.method, "method not found");
            let err = RpcError::MethodNotFound(envelope.method.clone());
            return codec.write_error(Some(&envelope), None, &err);
        };

        tracing::debug!(method = %envelope.method, "invoking method");
        let caught = catch_unwind(AssertUnwindSafe(|| {
            handle.call(ctx, envelope.params.as_ref())
        }));
        let outcome = match caught {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::error!(method = %envelope.method, "handler panicked");
                let err = RpcError::Application(MethodError::new("internal handler failure"));
                return codec.write_error(Some(&envelope), None, &err);
            }
        };

        match outcome {
            MethodOutcome::Reply(reply) => codec.write_reply(&envelope, &reply),
            MethodOutcome::InvalidParams(detail) => {
                let err = RpcError::InvalidParams(detail);
                codec.write_error(Some(&envelope), None, &err)
            }
            MethodOutcome::Fault { error, zero_reply } => {
                let err = RpcError::Application(error);
                codec.write_error(Some(&envelope), Some(&zero_reply), &err)
            }
            MethodOutcome::ReplyEncode(detail) => {
                tracing::error!(method = %envelope.method, error = %detail, "reply encoding failed");
                let err = RpcError::ReplyEncode(detail);
                codec.write_error(Some(&envelope), None, &err)
            }
        }
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

/// Media type portion of a Content-Type value: parameters stripped,
/// lowercased.
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Response for failures raised before a codec is available: plain text,
/// status from the error itself (405 or 415).
fn plain_response(err: &RpcError) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(err.to_string()));
    *response.status_mut() = err.status();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(TEXT_CONTENT_TYPE),
    );
    response
}

/// Response carrying a codec-encoded body: the codec's canonical content
/// type is echoed and MIME sniffing is disabled.
fn rpc_response(content_type: &str, encoded: EncodedResponse) -> Response<Bytes> {
    let mut response = Response::new(encoded.body);
    *response.status_mut() = encoded.status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
    );
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}
