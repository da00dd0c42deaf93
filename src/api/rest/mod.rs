//! # REST API
//!
//! axum handlers and router for the relayer's HTTP endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ErrorResponse, status_for};
pub use routes::create_router;
