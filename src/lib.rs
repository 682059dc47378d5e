//! # alder-rpc
//!
//! Request routing and codec dispatch for JSON RPC over HTTP.
//!
//! Incoming requests address a dotted `Service.Method` name. A codec
//! selected by the request's Content-Type decodes the method name and
//! argument payload, the registry resolves the target, and the dispatcher
//! invokes the typed handler and encodes the outcome back through the same
//! codec.
//!
//! ## Features
//!
//! - **Content-type negotiated codecs** - an envelope-in-body codec and a
//!   path-routed codec ship with the crate; the [`Codec`] trait admits more
//! - **Typed method registry** - handlers are plain closures with typed
//!   arguments and replies, checked at compile time, no runtime introspection
//! - **Single-response dispatch** - every request gets exactly one response;
//!   failures after codec selection map to HTTP 400 by protocol design
//! - **Axum transport** - optional `axum` feature mounting the dispatcher
//!   into a router
//!
//! ## Quick Start
//!
//! ```rust
//! use alder_rpc::{JsonCodec, MethodError, RequestContext, Server, Service};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize)]
//! struct MultiplyArgs {
//!     a: i64,
//!     b: i64,
//! }
//!
//! #[derive(Serialize, Default)]
//! struct MultiplyReply {
//!     product: i64,
//! }
//!
//! let mut server = Server::new();
//! server.register_codec(JsonCodec::new(), "application/json");
//! server
//!     .register_service(
//!         Service::builder("Arith")
//!             .method("Multiply", |_ctx: &RequestContext, args: MultiplyArgs| {
//!                 Ok::<_, MethodError>(MultiplyReply {
//!                     product: args.a * args.b,
//!                 })
//!             })
//!             .build(),
//!     )
//!     .expect("service registers");
//!
//! assert!(server.has_method("Arith.Multiply"));
//! ```
//!
//! Registration happens once during setup; [`Server::handle`] borrows the
//! server immutably, so share it behind an `Arc` with the transport once
//! wiring is done.

pub mod codec;
pub mod context;
pub mod error;
pub mod registry;
pub mod server;
pub mod service;
pub mod transports;

pub use codec::{Codec, EncodedResponse, JsonCodec, ProtoCodec, RequestEnvelope};
pub use context::RequestContext;
pub use error::{MethodError, RegistrationError, RpcError};
pub use registry::ServiceMap;
pub use server::Server;
pub use service::{Service, ServiceBuilder};

#[cfg(feature = "axum")]
pub use transports::axum::{AxumRpcBuilder, AxumRpcLayer, create_rpc_router};
