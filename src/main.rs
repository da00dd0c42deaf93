//! # ERC-20 Relayer
//!
//! Main entry point for the relayer service.

use anyhow::Context;
use erc20_relayer::api::rest::{AppState, create_router};
use erc20_relayer::application::ports::ChainConnector;
use erc20_relayer::application::use_cases::{RelaySettings, RelayTransferUseCase, TokenInfoUseCase};
use erc20_relayer::config::{AppConfig, LogConfig, LogFormat};
use erc20_relayer::domain::value_objects::{checksummed, parse_address};
use erc20_relayer::infrastructure::blockchain::{EthersConnector, NetworkRegistry};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down ERC-20 relayer");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.log);
    config.validate().context("invalid configuration")?;

    info!("Starting ERC-20 relayer v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(NetworkRegistry::from_config(&config));
    for (network, url) in registry.rpc_endpoints() {
        info!(network = %network, configured = url.is_some(), "network");
    }

    let relayer = &config.relayer;
    let connector = Arc::new(EthersConnector::new(
        relayer.private_key.as_deref(),
        relayer.priority_fee_wei,
    )?);

    let spender = relayer
        .spender_address
        .as_deref()
        .map(|s| parse_address("spender", s))
        .transpose()?;
    let recipient_override = relayer
        .recipient_override
        .as_deref()
        .map(|s| parse_address("recipient override", s))
        .transpose()?;

    match connector.relayer_address() {
        Some(address) => info!(relayer = %checksummed(&address), "relayer wallet loaded"),
        None => warn!("no relayer private key configured; transfers are disabled"),
    }
    if let Some(address) = recipient_override {
        info!(recipient = %checksummed(&address), "recipient override active");
    }

    let settings = RelaySettings {
        recipient_override,
        fee_aware: relayer.fee_aware,
    };

    let state = Arc::new(AppState {
        registry: Arc::clone(&registry),
        relay: Arc::new(RelayTransferUseCase::new(
            Arc::clone(&registry),
            connector.clone(),
            settings,
        )),
        token_info: Arc::new(TokenInfoUseCase::new(registry, connector, spender)),
    });

    let addr = config.rest.socket_addr()?;
    let router = create_router(state, &config.rest);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "ERC-20 relayer listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
