//! # API Layer
//!
//! HTTP interface of the relayer.
//!
//! ## REST
//!
//! JSON endpoints for configuration, token info and transfers, served at the
//! root and under `/api`.
//!
//! ## Middleware
//!
//! - Request logging with request ids
//! - CORS and HTTP tracing from `tower-http`

pub mod middleware;
pub mod rest;

pub use rest as rest_api;
