//! HTTP gateway for Raglet.
//!
//! Exposes the REST/JSON API (items, cache, vectors, documents, ask,
//! health checks), wires handlers to the service traits in
//! `raglet-core`, and dispatches slow work as fire-and-forget
//! background tasks.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, build_router, start};
