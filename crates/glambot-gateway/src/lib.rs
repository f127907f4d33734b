//! HTTP gateway.
//!
//! A small axum app: `POST /api/chat` runs the retrieval pipeline and
//! streams the answer as server-sent events, `GET /health` reports liveness.

pub mod routes;
pub mod server;
pub mod stream;

pub use server::{AppState, build_router, start};
