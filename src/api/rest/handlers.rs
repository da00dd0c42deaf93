//! # REST Handlers
//!
//! Request handlers for the relayer's HTTP endpoints.
//!
//! Request bodies use camelCase field names. Every failure is returned as
//! `{ "success": false, "error", "kind", "details"? }` with a status derived
//! from the error kind.
//!
//! # Endpoints
//!
//! - `GET /config` - Configured RPC URL per network
//! - `POST /config` - Accepted and ignored
//! - `POST /tokeninfo` - Token symbol and owner allowance
//! - `POST /transfer` - Relay a `transferFrom`
//! - `GET /health` - Liveness

use crate::application::TransferFailure;
use crate::application::use_cases::{
    RelayTransferUseCase, TokenInfoRequest, TokenInfoUseCase, TransferResult,
};
use crate::domain::entities::TransferRequest;
use crate::domain::errors::{ErrorDetails, ErrorKind, RelayError};
use crate::domain::value_objects::{Network, TransferStage, checksummed};
use crate::infrastructure::blockchain::NetworkRegistry;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Network registry.
    pub registry: Arc<NetworkRegistry>,
    /// Transfer relay use case.
    pub relay: Arc<RelayTransferUseCase>,
    /// Token info use case.
    pub token_info: Arc<TokenInfoUseCase>,
}

// ============================================================================
// Error Response
// ============================================================================

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Error category.
    pub kind: ErrorKind,
    /// Provider diagnostics, when the failure came from the chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
    /// Last transfer stage reached, for `/transfer` failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<TransferStage>,
}

impl ErrorResponse {
    /// Builds the response body for `error`.
    #[must_use]
    pub fn from_error(error: &RelayError) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            kind: error.kind(),
            details: error.details(),
            stage: None,
        }
    }
}

/// HTTP status for an error kind.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput
        | ErrorKind::NotConfigured
        | ErrorKind::UnsupportedToken
        | ErrorKind::NotAContract
        | ErrorKind::AllowanceTooLow
        | ErrorKind::InsufficientBalance => StatusCode::BAD_REQUEST,
        ErrorKind::RelayerUnderfunded => StatusCode::PAYMENT_REQUIRED,
        ErrorKind::RpcError
        | ErrorKind::SubmissionFailed
        | ErrorKind::CallReverted
        | ErrorKind::Misconfigured
        | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error half of every handler's result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl From<RelayError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: RelayError) -> Self {
        (status_for(err.kind()), Json(ErrorResponse::from_error(&err)))
    }
}

impl From<TransferFailure> for (StatusCode, Json<ErrorResponse>) {
    fn from(failure: TransferFailure) -> Self {
        let mut body = ErrorResponse::from_error(&failure.error);
        body.stage = Some(failure.stage);
        (status_for(failure.kind()), Json(body))
    }
}

fn malformed_body(rejection: &JsonRejection) -> ApiError {
    RelayError::invalid_input(format!("Invalid request body: {}", rejection.body_text())).into()
}

fn parse_network(name: &str) -> Result<Network, ApiError> {
    name.parse::<Network>().map_err(ApiError::from)
}

/// Returns the first non-blank value.
fn non_blank<'a>(values: impl IntoIterator<Item = &'a Option<String>>) -> Option<&'a str> {
    values
        .into_iter()
        .filter_map(|v| v.as_deref().map(str::trim))
        .find(|v| !v.is_empty())
}

// ============================================================================
// Config
// ============================================================================

/// Acknowledgement body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always `true`.
    pub success: bool,
}

/// Returns the RPC URL configured for each network, `null` where absent.
#[instrument(skip(state))]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<BTreeMap<Network, Option<String>>> {
    Json(state.registry.rpc_endpoints())
}

/// Accepts and ignores a configuration update.
pub async fn post_config() -> Json<AckResponse> {
    Json(AckResponse { success: true })
}

// ============================================================================
// Token Info
// ============================================================================

/// Token info request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoBody {
    /// Token contract address.
    pub token_address: Option<String>,
    /// Token symbol, used when no address is given.
    pub token_symbol: Option<String>,
    /// Owner address.
    pub owner: Option<String>,
    /// Network name.
    pub network: Option<String>,
}

/// Token info response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoResponse {
    /// Token symbol.
    pub symbol: String,
    /// Allowance to the spender, in token units.
    pub allowance: String,
    /// Token decimals.
    pub decimals: u8,
    /// Spender address.
    pub spender: String,
}

/// Reads a token's symbol and an owner's allowance to the spender.
///
/// # Errors
///
/// - 400 for missing or invalid fields, unknown networks or tokens
/// - 500 when no spender is configured or an RPC read fails
#[instrument(skip(state, body))]
pub async fn token_info(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TokenInfoBody>, JsonRejection>,
) -> Result<Json<TokenInfoResponse>, ApiError> {
    let Json(body) = body.map_err(|e| malformed_body(&e))?;

    let (Some(token), Some(owner), Some(network)) = (
        non_blank([&body.token_address, &body.token_symbol]),
        non_blank([&body.owner]),
        non_blank([&body.network]),
    ) else {
        return Err(RelayError::invalid_input(
            "Missing parameters: tokenAddress, owner, network required",
        )
        .into());
    };

    let request = TokenInfoRequest {
        token: token.to_string(),
        owner: owner.to_string(),
        network: parse_network(network)?,
    };

    let info = state.token_info.execute(request).await.map_err(|e| {
        warn!(kind = %e.kind(), error = %e, "token info failed");
        ApiError::from(e)
    })?;

    Ok(Json(TokenInfoResponse {
        symbol: info.symbol,
        allowance: info.allowance,
        decimals: info.decimals,
        spender: checksummed(&info.spender),
    }))
}

// ============================================================================
// Transfer
// ============================================================================

/// The `amount` field as sent by the client.
///
/// Only decimal strings are scaled. JSON numbers are rejected: they pass
/// through `f64` and lose digits before scaling could truncate them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    /// `"1.5"`
    Text(String),
    /// `1.5`
    Number(serde_json::Number),
}

impl AmountField {
    fn into_text(self) -> Result<String, RelayError> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Number(number) => Err(RelayError::invalid_input(format!(
                "Invalid amount: {number}. Amount must be a decimal string"
            ))),
        }
    }
}

/// Transfer request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    /// Token symbol.
    pub token_symbol: Option<String>,
    /// Token contract address, preferred over the symbol when both are set.
    pub token_address: Option<String>,
    /// Owner address.
    pub owner: Option<String>,
    /// Decimal amount in token units.
    pub amount: Option<AmountField>,
    /// Network name.
    pub network: Option<String>,
    /// Optional recipient.
    pub recipient: Option<String>,
}

/// Successful transfer body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    /// Always `true`.
    pub success: bool,
    /// Transaction hash.
    pub tx_hash: String,
    /// Same as `tx_hash`, kept for older clients.
    pub hash: String,
    /// Block the transaction was mined in.
    pub block_number: Option<u64>,
    /// Time spent handling the request.
    pub elapsed_ms: u64,
}

impl From<TransferResult> for TransferResponse {
    fn from(result: TransferResult) -> Self {
        let tx_hash = format!("{:#x}", result.tx_hash);
        Self {
            success: true,
            hash: tx_hash.clone(),
            tx_hash,
            block_number: result.block_number,
            elapsed_ms: result.elapsed_ms,
        }
    }
}

/// Relays an ERC-20 `transferFrom` from the owner.
///
/// # Errors
///
/// - 400 for invalid input and owner-side rejections
/// - 402 when the relayer cannot pay for gas
/// - 500 for provider, submission and server configuration failures
#[instrument(skip(state, body))]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TransferBody>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let Json(body) = body.map_err(|e| malformed_body(&e))?;

    let amount = body
        .amount
        .map(AmountField::into_text)
        .transpose()?
        .filter(|a| !a.trim().is_empty());

    let (Some(token), Some(owner), Some(amount), Some(network)) = (
        non_blank([&body.token_address, &body.token_symbol]),
        non_blank([&body.owner]),
        amount,
        non_blank([&body.network]),
    ) else {
        return Err(RelayError::invalid_input(
            "Missing required fields: tokenSymbol, owner, amount, network",
        )
        .into());
    };

    let mut request = TransferRequest::new(token, owner, amount.trim(), parse_network(network)?);
    request.recipient = body.recipient;

    info!(network = %request.network, token = %request.token, "transfer requested");

    let result = state.relay.execute(request).await?;
    Ok(Json(TransferResponse::from(result)))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
