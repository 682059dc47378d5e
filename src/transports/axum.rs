//! Axum HTTP transport for the RPC dispatcher.
//!
//! Mounts a [`Server`] under a path prefix. Both the prefix itself and every
//! path below it are routed to the dispatcher, so codecs that carry the
//! method name in the URI path see the full request path.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::routing::any;
use http::{HeaderValue, Request, Response, StatusCode, header};

use crate::server::Server;

/// Request bodies beyond this size are rejected before dispatch.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builder for mounting a [`Server`] into an Axum router.
pub struct AxumRpcBuilder {
    server: Option<Arc<Server>>,
    path: String,
}

impl AxumRpcBuilder {
    pub fn new() -> Self {
        Self {
            server: None,
            path: "/rpc".to_string(),
        }
    }

    pub fn server(mut self, server: Arc<Server>) -> Self {
        self.server = Some(server);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn build(self) -> Result<AxumRpcLayer, std::io::Error> {
        let server = self.server.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Server not set")
        })?;

        Ok(AxumRpcLayer {
            server,
            path: self.path,
        })
    }
}

impl Default for AxumRpcBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured mount point, convertible into an Axum [`Router`].
pub struct AxumRpcLayer {
    server: Arc<Server>,
    path: String,
}

impl AxumRpcLayer {
    pub fn builder() -> AxumRpcBuilder {
        AxumRpcBuilder::new()
    }

    pub fn into_router(self) -> Router {
        let prefix = self.path.trim_end_matches('/');
        let wildcard = format!("{prefix}/{{*method}}");
        let root = if prefix.is_empty() { "/" } else { prefix };
        Router::new()
            .route(root, any(handle_rpc))
            .route(&wildcard, any(handle_rpc))
            .with_state(self.server)
    }
}

/// Mount `server` under `path` in a fresh router.
pub fn create_rpc_router(server: Arc<Server>, path: &str) -> Router {
    AxumRpcLayer {
        server,
        path: path.to_string(),
    }
    .into_router()
}

async fn handle_rpc(
    State(server): State<Arc<Server>>,
    request: Request<Body>,
) -> Response<Body> {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            return unreadable_body_response();
        }
    };
    server
        .handle(Request::from_parts(parts, bytes))
        .map(Body::from)
}

fn unreadable_body_response() -> Response<Body> {
    let mut response = Response::new(Body::from("request body unreadable or too large"));
    *response.status_mut() = StatusCode::BAD_REQUEST;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
