//! # Request Logging
//!
//! Per-request structured logging with request ids.
//!
//! Every request gets an id: the caller's `X-Request-ID` header when it is
//! present and valid, otherwise a fresh UUID v4. The id is recorded on the
//! span and echoed on the response.
//! Completion is logged at `info` for 2xx/3xx, `warn` for 4xx and `error`
//! for 5xx.
//!
//! # Usage
//!
//! ```ignore
//! use axum::middleware::from_fn;
//! use erc20_relayer::api::middleware::logging::request_logging;
//!
//! let app = Router::new()
//!     .route("/health", get(handler))
//!     .layer(from_fn(request_logging));
//! ```

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Span, debug, error, info, instrument, warn};
use uuid::Uuid;

/// Header carrying the request id.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller-supplied request id that is reused.
const MAX_REQUEST_ID_LEN: usize = 128;

// ============================================================================
// Request ID
// ============================================================================

/// A request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generates a random request id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuses the caller's id from `headers` if it is printable ASCII of
    /// reasonable length, otherwise generates one.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
            .map(|id| Self(id.to_string()))
            .unwrap_or_else(Self::generate)
    }

    /// Returns the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Logs each request with its id, status and latency.
#[instrument(skip_all, fields(request_id, method, path))]
pub async fn request_logging(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = RequestId::from_headers(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = Span::current();
    span.record("request_id", request_id.as_str());
    span.record("method", method.as_str());
    span.record("path", path.as_str());

    debug!("request started");

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    let status = response.status().as_u16();
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if response.status().is_server_error() {
        error!(status, duration_ms, "request failed");
    } else if response.status().is_client_error() {
        warn!(status, duration_ms, "request rejected");
    } else {
        info!(status, duration_ms, "request completed");
    }

    response
}
