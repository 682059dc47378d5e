//! Per-request metadata handed to codecs and method handlers.

use http::{HeaderMap, Method, Uri, header};

/// Read-only view of the HTTP request a method is invoked for.
///
/// Handlers receive this alongside their decoded arguments. Deadlines and
/// cancellation are the transport's concern; the context only carries what
/// the request itself said.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestContext {
    pub(crate) fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Media type of the request body: Content-Type with any parameters
    /// (charset and friends) stripped, lowercased. Empty when the header is
    /// missing or unreadable.
    pub fn media_type(&self) -> String {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }

    /// Last segment of the URI path, or `None` when the path ends in `/`.
    /// Codecs that route by path use this as the method name.
    pub fn path_method(&self) -> Option<&str> {
        self.uri
            .path()
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn context(content_type: Option<&str>, path: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(value).unwrap());
        }
        RequestContext::new(Method::POST, path.parse().unwrap(), headers)
    }

    #[test]
    fn test_media_type_strips_parameters() {
        let ctx = context(Some("application/json; charset=utf-8"), "/rpc");
        assert_eq!(ctx.media_type(), "application/json");
    }

    #[test]
    fn test_media_type_lowercases() {
        let ctx = context(Some("Application/JSON"), "/rpc");
        assert_eq!(ctx.media_type(), "application/json");
    }

    #[test]
    fn test_media_type_missing_header() {
        let ctx = context(None, "/rpc");
        assert_eq!(ctx.media_type(), "");
    }

    #[test]
    fn test_path_method_last_segment() {
        let ctx = context(None, "/rpc/Arith.Multiply");
        assert_eq!(ctx.path_method(), Some("Arith.Multiply"));
    }

    #[test]
    fn test_path_method_root() {
        let ctx = context(None, "/");
        assert_eq!(ctx.path_method(), None);
    }

    #[test]
    fn test_path_method_trailing_slash() {
        let ctx = context(None, "/rpc/");
        assert_eq!(ctx.path_method(), None);
    }

    #[test]
    fn test_accessors() {
        let ctx = context(Some("application/json"), "/rpc/Arith.Multiply");
        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.uri().path(), "/rpc/Arith.Multiply");
        assert!(ctx.headers().contains_key(header::CONTENT_TYPE));
    }
}
