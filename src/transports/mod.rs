//! Transport adapters that mount the dispatcher onto an HTTP server.
//!
//! The core dispatch pipeline is synchronous and transport-neutral; adapters
//! here bridge it to a concrete HTTP stack. Enable the `axum` feature for
//! the Axum router adapter.

#[cfg(feature = "axum")]
pub mod axum;
