//! # Relay Transfer Use Case
//!
//! Executes an owner-approved `transferFrom` paid for by the relayer.
//!
//! The pipeline validates input before touching the chain, reads token state
//! concurrently, then runs authorization, fee planning and submission
//! strictly in sequence.

use crate::application::error::{ApplicationResult, TransferFailure};
use crate::application::ports::{ChainConnector, TransferSubmitter};
use crate::domain::entities::{AllowanceState, FeePlan, TokenMetadata, TransferCall, TransferRequest};
use crate::domain::errors::{RelayError, RelayResult};
use crate::domain::services::{authorize, ensure_relayer_funded, require_contract};
use crate::domain::value_objects::{
    TransferStage, checksummed, format_units, is_valid_amount, parse_address, scale_amount,
};
use crate::infrastructure::blockchain::NetworkRegistry;
use ethers::types::{Address, H256, U256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Relay behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySettings {
    /// Recipient forced for every transfer.
    pub recipient_override: Option<Address>,
    /// Estimate gas, plan fees and check relayer funding before submitting.
    pub fee_aware: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            recipient_override: None,
            fee_aware: true,
        }
    }
}

/// A confirmed relayed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResult {
    /// Transaction hash.
    pub tx_hash: H256,
    /// Block number, `None` when the provider returned no receipt.
    pub block_number: Option<u64>,
    /// Wall-clock time since the request started.
    pub elapsed_ms: u64,
    /// Address that received the tokens.
    pub recipient: Address,
    /// Amount moved, in base units.
    pub value: U256,
}

#[derive(Debug, Default)]
struct StageTracker(TransferStage);

impl StageTracker {
    fn advance(&mut self, next: TransferStage) {
        debug_assert!(
            self.0.can_transition_to(next),
            "illegal stage transition {} -> {next}",
            self.0
        );
        debug!(stage = %next, "transfer stage reached");
        self.0 = next;
    }

    fn current(&self) -> TransferStage {
        self.0
    }
}

/// Use case for relaying a transfer.
///
/// Orchestrates the relay workflow:
/// 1. Validate owner, amount, network, token and recipient
/// 2. Require contract bytecode at the token address
/// 3. Read symbol, decimals, allowance, balance and chain id concurrently
/// 4. Scale the amount and authorize against allowance then balance
/// 5. Estimate gas, plan fees and check relayer funding
/// 6. Submit and wait for one confirmation
#[derive(Debug)]
pub struct RelayTransferUseCase {
    registry: Arc<NetworkRegistry>,
    connector: Arc<dyn ChainConnector>,
    settings: RelaySettings,
}

impl RelayTransferUseCase {
    /// Creates a new RelayTransferUseCase.
    #[must_use]
    pub fn new(
        registry: Arc<NetworkRegistry>,
        connector: Arc<dyn ChainConnector>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            registry,
            connector,
            settings,
        }
    }

    /// Relays a transfer.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferFailure`] carrying the last stage reached and the
    /// classified [`RelayError`].
    #[instrument(skip(self, request), fields(network = %request.network, token = %request.token))]
    pub async fn execute(&self, request: TransferRequest) -> ApplicationResult<TransferResult> {
        let started = Instant::now();
        let mut stage = StageTracker::default();

        let outcome = self.relay(&request, &mut stage, started).await;

        match outcome {
            Ok(result) => {
                info!(
                    tx_hash = ?result.tx_hash,
                    block_number = ?result.block_number,
                    elapsed_ms = result.elapsed_ms,
                    "transfer confirmed"
                );
                Ok(result)
            }
            Err(error) => {
                warn!(
                    stage = %stage.current(),
                    kind = %error.kind(),
                    error = %error,
                    "transfer failed"
                );
                Err(TransferFailure::new(stage.current(), error))
            }
        }
    }

    async fn relay(
        &self,
        request: &TransferRequest,
        stage: &mut StageTracker,
        started: Instant,
    ) -> RelayResult<TransferResult> {
        let network = self.registry.resolve(request.network)?;
        let owner = parse_address("owner", &request.owner)?;
        if !is_valid_amount(&request.amount) {
            return Err(RelayError::invalid_input(format!(
                "Invalid amount: {}",
                request.amount
            )));
        }
        let token = network.resolve_token_address(&request.token)?;
        let requested_recipient = request
            .explicit_recipient()
            .map(|recipient| parse_address("recipient", recipient))
            .transpose()?;

        let chain = self.connector.submitter(&network).await?;
        let relayer = chain.relayer_address();
        let recipient = self
            .settings
            .recipient_override
            .or(requested_recipient)
            .unwrap_or(relayer);
        stage.advance(TransferStage::Validated);

        let has_code = chain.has_contract_code(token).await?;
        require_contract(&token, network.network, has_code)?;

        let (symbol, decimals, allowance, owner_balance, chain_id) = tokio::try_join!(
            chain.symbol(token),
            chain.decimals(token),
            chain.allowance(token, owner, relayer),
            chain.balance_of(token, owner),
            chain.chain_id(),
        )?;

        let expected_chain_id = network.network.chain_id();
        if chain_id != expected_chain_id {
            return Err(RelayError::misconfigured(format!(
                "RPC endpoint for {} reports chain id {chain_id}, expected {expected_chain_id}",
                network.network
            )));
        }

        let metadata = TokenMetadata {
            address: token,
            symbol,
            decimals,
        };
        let state = AllowanceState::new(allowance, owner_balance);
        stage.advance(TransferStage::MetadataFetched);

        let value = scale_amount(&request.amount, metadata.decimals)?;

        info!(
            network = %network.network,
            chain_id,
            token = %checksummed(&metadata.address),
            symbol = %metadata.symbol,
            decimals = metadata.decimals,
            owner = %checksummed(&owner),
            relayer = %checksummed(&relayer),
            recipient = %checksummed(&recipient),
            value = %value,
            allowance = %format_units(state.allowance(), metadata.decimals),
            unlimited = state.is_unlimited(),
            owner_balance = %format_units(state.owner_balance(), metadata.decimals),
            "transfer diagnostics"
        );

        authorize(&metadata, &state, value)?;
        stage.advance(TransferStage::Authorized);

        let call = TransferCall {
            token,
            from: owner,
            to: recipient,
            value,
        };

        let plan = if self.settings.fee_aware {
            plan_fees(chain.as_ref(), &call).await?
        } else {
            FeePlan::provider_defaults()
        };
        stage.advance(TransferStage::FeePlanned);

        let tx_hash = chain.send_transfer(&call, &plan).await?;
        info!(tx_hash = ?tx_hash, "transfer submitted");
        stage.advance(TransferStage::Submitted);

        let block_number = chain.wait_for_confirmation(tx_hash).await?;
        stage.advance(TransferStage::Confirmed);

        Ok(TransferResult {
            tx_hash,
            block_number,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            recipient,
            value,
        })
    }
}

async fn plan_fees(chain: &dyn TransferSubmitter, call: &TransferCall) -> RelayResult<FeePlan> {
    let gas_limit = match chain.estimate_transfer_gas(call).await {
        Ok(gas) => {
            info!(estimated_gas = %gas, "gas estimated");
            Some(gas)
        }
        Err(error) => {
            warn!(error = %error, "gas estimation failed, submitting without a gas limit");
            None
        }
    };

    let fees = chain.fee_data().await?;
    let plan = FeePlan::from_fee_data(gas_limit, &fees);

    if let Some(required) = plan.required_native() {
        let balance = chain.native_balance(chain.relayer_address()).await?;
        info!(
            eip1559 = plan.is_eip1559(),
            required_wei = %required,
            relayer_balance_wei = %balance,
            "relayer funding checked"
        );
        ensure_relayer_funded(&plan, balance)?;
    }

    Ok(plan)
}
