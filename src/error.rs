//! Error types for service registration and request dispatch.

use http::StatusCode;
use thiserror::Error;

/// Setup-time failure while registering a service.
///
/// Fatal to the registration call: the service is not recorded and the caller
/// decides whether to abort startup or skip the service. Never produced while
/// serving traffic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A service with this name is already registered. Duplicate names are
    /// rejected rather than silently replaced.
    #[error("service already registered: {0:?}")]
    DuplicateService(String),

    /// The service exposes no methods.
    #[error("service {0:?} has no methods")]
    NoMethods(String),
}

/// Request-time failure inside the dispatch pipeline.
///
/// Every variant is terminal: the dispatcher converts it into exactly one
/// HTTP response and nothing is retried at this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// The request used an HTTP method other than POST.
    #[error("POST method required, received {0}")]
    MethodRequired(String),

    /// No codec is registered for the request's Content-Type.
    #[error("unrecognized Content-Type: {0:?}")]
    UnsupportedContentType(String),

    /// The request body was absent, malformed, or named no method.
    #[error("malformed request: {0}")]
    Decode(String),

    /// The request named a service or method that is not registered.
    #[error("method not found: {0:?}")]
    MethodNotFound(String),

    /// The argument payload did not decode into the method's argument type.
    #[error("invalid method parameters: {0}")]
    InvalidParams(String),

    /// The handler itself rejected the call.
    #[error("{0}")]
    Application(MethodError),

    /// The handler's reply could not be serialized.
    #[error("failed to encode reply: {0}")]
    ReplyEncode(String),
}

impl RpcError {
    /// The HTTP status this failure maps onto.
    ///
    /// Everything after codec selection collapses to 400: clients tell a
    /// malformed request apart from an application rejection by message
    /// content only. That collapse is protocol behavior, not an oversight,
    /// and this is the one place a finer mapping would go.
    pub fn status(&self) -> StatusCode {
        match self {
            RpcError::MethodRequired(_) => StatusCode::METHOD_NOT_ALLOWED,
            RpcError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RpcError::Decode(_)
            | RpcError::MethodNotFound(_)
            | RpcError::InvalidParams(_)
            | RpcError::Application(_)
            | RpcError::ReplyEncode(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Application-level error returned by a method handler.
///
/// The display string is embedded verbatim in the codec's error envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct MethodError {
    message: String,
}

impl MethodError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for MethodError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for MethodError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_display() {
        let err = RegistrationError::DuplicateService("Arith".to_string());
        assert_eq!(err.to_string(), "service already registered: \"Arith\"");

        let err = RegistrationError::NoMethods("Empty".to_string());
        assert_eq!(err.to_string(), "service \"Empty\" has no methods");
    }

    #[test]
    fn test_rpc_error_status_mapping() {
        assert_eq!(
            RpcError::MethodRequired("GET".to_string()).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            RpcError::UnsupportedContentType("text/xml".to_string()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            RpcError::Decode("eof".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::MethodNotFound("A.B".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::InvalidParams("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::Application(MethodError::new("nope")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RpcError::ReplyEncode("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_application_error_message_verbatim() {
        let err = RpcError::Application(MethodError::new("response error"));
        assert_eq!(err.to_string(), "response error");
    }

    #[test]
    fn test_method_error_accessors() {
        let err = MethodError::new("boom");
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_method_error_from_string() {
        let from_owned: MethodError = String::from("owned").into();
        assert_eq!(from_owned.message(), "owned");

        let from_str: MethodError = "borrowed".into();
        assert_eq!(from_str.message(), "borrowed");
    }

    #[test]
    fn test_method_not_found_display() {
        let err = RpcError::MethodNotFound("Arith.Divide".to_string());
        assert_eq!(err.to_string(), "method not found: \"Arith.Divide\"");
    }
}
