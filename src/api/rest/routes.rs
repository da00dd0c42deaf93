//! # REST Routes
//!
//! Router for the relayer's HTTP API.
//!
//! # Route Structure
//!
//! Every route is served both at the root and under `/api`:
//!
//! ```text
//! /config      GET  - RPC URL per network
//!              POST - Acknowledge
//! /tokeninfo   POST - Token symbol and allowance
//! /transfer    POST - Relay a transferFrom
//! /health      GET  - Health check
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use erc20_relayer::api::rest::routes::create_router;
//!
//! let router = create_router(state, &config.rest);
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, router).await?;
//! ```

use crate::api::middleware::logging::request_logging;
use crate::api::rest::handlers::{
    AppState, get_config, health_check, post_config, token_info, transfer,
};
use crate::config::RestConfig;
use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::{Router, routing::get, routing::post};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/config", get(get_config).post(post_config))
        .route("/tokeninfo", post(token_info))
        .route("/transfer", post(transfer))
        .route("/health", get(health_check))
}

fn cors_layer(config: &RestConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the REST API router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `config` - REST settings; controls the CORS layer
#[must_use]
pub fn create_router(state: Arc<AppState>, config: &RestConfig) -> Router {
    let router = Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(from_fn(request_logging))
        .layer(TraceLayer::new_for_http());

    let router = if config.enable_cors {
        router.layer(cors_layer(config))
    } else {
        router
    };

    router.with_state(state)
}

/// Creates a router without tracing, logging or CORS layers.
#[cfg(test)]
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .with_state(state)
}
