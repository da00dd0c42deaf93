//! # EVM Client
//!
//! ethers-rs implementation of the chain ports.
//!
//! [`EvmClient`] wraps any [`Middleware`]: a bare HTTP provider for reads,
//! or a [`SignerMiddleware`] over one for submissions.

use super::erc20::{self, AbiDecodeError};
use crate::application::ports::{ChainReader, TransferSubmitter};
use crate::domain::entities::{FeeData, FeePlan, TransferCall};
use crate::domain::errors::{ProviderFailure, RelayError, RelayResult};
use crate::domain::services::{classify, classify_submission, fee_data_from_base_fee};
use crate::domain::value_objects::Network;
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use std::fmt;
use tracing::{debug, warn};

/// HTTP provider type alias.
pub type HttpProvider = Provider<Http>;

/// Chain client for a single network.
#[derive(Clone)]
pub struct EvmClient<M> {
    client: M,
    network: Network,
    priority_fee: U256,
}

impl<M> EvmClient<M> {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `client` - Provider or signing middleware
    /// * `network` - Network the middleware points at
    /// * `priority_fee` - Priority fee per gas used when deriving EIP-1559 fees
    #[must_use]
    pub fn new(client: M, network: Network, priority_fee: U256) -> Self {
        Self {
            client,
            network,
            priority_fee,
        }
    }

    /// Returns the network.
    #[inline]
    #[must_use]
    pub fn network(&self) -> Network {
        self.network
    }
}

impl<M> fmt::Debug for EvmClient<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmClient")
            .field("network", &self.network)
            .field("priority_fee", &self.priority_fee)
            .finish_non_exhaustive()
    }
}

/// Captures a middleware error as a [`ProviderFailure`].
///
/// JSON-RPC errors contribute their code, message and data; `Error(string)`
/// revert payloads found in the data are decoded into the reason.
#[must_use]
pub fn provider_failure<E: MiddlewareError>(error: &E) -> ProviderFailure {
    let mut failure = ProviderFailure::from_message(error.to_string());

    if let Some(rpc) = error.as_error_response() {
        failure = failure
            .with_code(rpc.code.to_string())
            .with_short_message(rpc.message.clone());
        if let Some(data) = &rpc.data {
            if let Some(reason) = erc20::revert_data(data)
                .as_deref()
                .and_then(erc20::decode_revert_reason)
            {
                failure = failure.with_reason(reason);
            }
            failure = failure.with_data(data.clone());
        }
    }

    failure
}

fn bad_data(operation: &str, error: &AbiDecodeError) -> RelayError {
    RelayError::rpc(
        operation,
        ProviderFailure::from_message(error.to_string()).with_code("BAD_DATA"),
    )
}

/// Builds the `transferFrom` transaction sent by `sender` under `plan`.
fn transfer_transaction(sender: Address, call: &TransferCall, plan: &FeePlan) -> TypedTransaction {
    let data = erc20::encode_transfer_from(call.from, call.to, call.value);
    let mut tx: TypedTransaction = if plan.is_eip1559() {
        let mut request = Eip1559TransactionRequest::new().to(call.token).data(data);
        if let Some(max_fee) = plan.max_fee_per_gas() {
            request = request.max_fee_per_gas(max_fee);
        }
        if let Some(priority) = plan.max_priority_fee_per_gas() {
            request = request.max_priority_fee_per_gas(priority);
        }
        request.into()
    } else {
        let mut request = TransactionRequest::new().to(call.token).data(data);
        if let Some(price) = plan.gas_price() {
            request = request.gas_price(price);
        }
        request.into()
    };
    tx.set_from(sender);
    if let Some(gas) = plan.gas_limit() {
        tx.set_gas(gas);
    }
    tx
}

impl<M: Middleware + 'static> EvmClient<M> {
    async fn call(&self, operation: &str, token: Address, data: Bytes) -> RelayResult<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(token).data(data).into();
        self.client
            .call(&tx, None)
            .await
            .map_err(|e| RelayError::rpc(operation, provider_failure(&e)))
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for EvmClient<M> {
    async fn symbol(&self, token: Address) -> RelayResult<String> {
        let data = self.call("symbol", token, erc20::encode_symbol()).await?;
        erc20::decode_symbol(&data).map_err(|e| bad_data("symbol", &e))
    }

    async fn decimals(&self, token: Address) -> RelayResult<u8> {
        let data = self.call("decimals", token, erc20::encode_decimals()).await?;
        erc20::decode_decimals(&data).map_err(|e| bad_data("decimals", &e))
    }

    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> RelayResult<U256> {
        let data = self
            .call("allowance", token, erc20::encode_allowance(owner, spender))
            .await?;
        erc20::decode_uint(&data).map_err(|e| bad_data("allowance", &e))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> RelayResult<U256> {
        let data = self
            .call("balanceOf", token, erc20::encode_balance_of(owner))
            .await?;
        erc20::decode_uint(&data).map_err(|e| bad_data("balanceOf", &e))
    }

    async fn has_contract_code(&self, address: Address) -> RelayResult<bool> {
        let code = self
            .client
            .get_code(address, None)
            .await
            .map_err(|e| RelayError::rpc("getCode", provider_failure(&e)))?;
        Ok(!code.is_empty())
    }

    async fn fee_data(&self) -> RelayResult<FeeData> {
        let block = self
            .client
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| RelayError::rpc("getBlock", provider_failure(&e)))?;

        if let Some(base_fee) = block.and_then(|b| b.base_fee_per_gas) {
            debug!(network = %self.network, base_fee = %base_fee, "using EIP-1559 fees");
            return Ok(fee_data_from_base_fee(base_fee, self.priority_fee));
        }

        let gas_price = self
            .client
            .get_gas_price()
            .await
            .map_err(|e| RelayError::rpc("gasPrice", provider_failure(&e)))?;
        Ok(FeeData::legacy(gas_price))
    }

    async fn chain_id(&self) -> RelayResult<u64> {
        self.client
            .get_chainid()
            .await
            .map(|id| id.low_u64())
            .map_err(|e| RelayError::rpc("chainId", provider_failure(&e)))
    }

    async fn native_balance(&self, address: Address) -> RelayResult<U256> {
        self.client
            .get_balance(address, None)
            .await
            .map_err(|e| RelayError::rpc("getBalance", provider_failure(&e)))
    }
}

#[async_trait]
impl<M, S> TransferSubmitter for EvmClient<SignerMiddleware<M, S>>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    fn relayer_address(&self) -> Address {
        self.client.address()
    }

    async fn estimate_transfer_gas(&self, call: &TransferCall) -> RelayResult<U256> {
        let tx: TypedTransaction = TransactionRequest::new()
            .from(self.client.address())
            .to(call.token)
            .data(erc20::encode_transfer_from(call.from, call.to, call.value))
            .into();
        self.client
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| classify(provider_failure(&e)))
    }

    async fn send_transfer(&self, call: &TransferCall, plan: &FeePlan) -> RelayResult<H256> {
        let tx = transfer_transaction(self.client.address(), call, plan);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| classify_submission(provider_failure(&e)))?;
        Ok(pending.tx_hash())
    }

    async fn wait_for_confirmation(&self, tx_hash: H256) -> RelayResult<Option<u64>> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .confirmations(1)
            .await
            .map_err(|e| classify_submission(provider_failure(&e)))?;

        let Some(receipt) = receipt else {
            warn!(
                network = %self.network,
                tx_hash = ?tx_hash,
                "transaction dropped from mempool or receipt unavailable"
            );
            return Ok(None);
        };

        if receipt.status == Some(U64::zero()) {
            return Err(RelayError::CallReverted(
                ProviderFailure::from_message(format!("Transaction {tx_hash:?} reverted"))
                    .with_code("CALL_EXCEPTION"),
            ));
        }

        Ok(receipt.block_number.map(|n| n.as_u64()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;
    use ethers::abi::{Token, encode};
    use ethers::providers::{MockProvider, MockResponse};
    use std::time::Duration;

    const KEY: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    type SigningClient = EvmClient<SignerMiddleware<Provider<MockProvider>, LocalWallet>>;

    fn mocked() -> (EvmClient<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        (
            EvmClient::new(provider, Network::Sepolia, U256::from(1_000_000_000u64)),
            mock,
        )
    }

    #[tokio::test]
    async fn reads_symbol() {
        let (client, mock) = mocked();
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::String("USDC".to_string())])))
            .unwrap();

        let symbol = client.symbol(Address::repeat_byte(1)).await.unwrap();
        assert_eq!(symbol, "USDC");
    }

    #[tokio::test]
    async fn reads_decimals() {
        let (client, mock) = mocked();
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(U256::from(6))])))
            .unwrap();

        assert_eq!(client.decimals(Address::repeat_byte(1)).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn empty_return_is_bad_data() {
        let (client, mock) = mocked();
        mock.push::<Bytes, _>(Bytes::new()).unwrap();

        let err = client.balance_of(Address::repeat_byte(1), Address::zero()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RpcError);
        assert_eq!(err.details().unwrap().code.as_deref(), Some("BAD_DATA"));
    }

    #[tokio::test]
    async fn detects_contract_code() {
        let (client, mock) = mocked();
        mock.push::<Bytes, _>(Bytes::from(vec![0x60, 0x80])).unwrap();
        assert!(client.has_contract_code(Address::repeat_byte(1)).await.unwrap());

        mock.push::<Bytes, _>(Bytes::new()).unwrap();
        assert!(!client.has_contract_code(Address::repeat_byte(1)).await.unwrap());
    }

    #[tokio::test]
    async fn reads_chain_id() {
        let (client, mock) = mocked();
        mock.push::<U256, _>(U256::from(11_155_111u64)).unwrap();
        assert_eq!(client.chain_id().await.unwrap(), 11_155_111);
    }

    #[tokio::test]
    async fn revert_is_reported_with_reason() {
        let (client, mock) = mocked();
        let mut payload = erc20::ERROR_STRING_SELECTOR.to_vec();
        payload.extend(encode(&[Token::String("paused".to_string())]));
        mock.push_response(MockResponse::Error(JsonRpcError {
            code: 3,
            message: "execution reverted: paused".to_string(),
            data: Some(serde_json::Value::String(format!(
                "0x{}",
                ethers::utils::hex::encode(&payload)
            ))),
        }));

        let err = client.symbol(Address::repeat_byte(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RpcError);
        let details = err.details().unwrap();
        assert_eq!(details.code.as_deref(), Some("3"));
        assert_eq!(details.reason.as_deref(), Some("paused"));
        assert_eq!(details.short_message.as_deref(), Some("execution reverted: paused"));
    }

    #[test]
    fn failure_without_rpc_payload_keeps_message() {
        let failure = provider_failure(&ProviderError::CustomError("connection refused".to_string()));
        assert!(failure.message.contains("connection refused"));
        assert_eq!(failure.code, None);
        assert_eq!(failure.data, None);
    }

    #[test]
    fn debug_hides_middleware() {
        let (client, _mock) = mocked();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("Sepolia"));
        assert_eq!(client.network(), Network::Sepolia);
    }

    #[test]
    fn submitter_reports_signer_address() {
        let (provider, _mock) = Provider::mocked();
        let wallet: LocalWallet = KEY.parse().unwrap();
        let expected = wallet.address();
        let client = EvmClient::new(
            SignerMiddleware::new(provider, wallet),
            Network::Sepolia,
            U256::zero(),
        );
        assert_eq!(client.relayer_address(), expected);
    }

    fn signing_client() -> (SigningClient, MockProvider, LocalWallet) {
        let (provider, mock) = Provider::mocked();
        let provider = provider.interval(Duration::from_millis(1));
        let wallet = KEY
            .parse::<LocalWallet>()
            .unwrap()
            .with_chain_id(Network::Sepolia.chain_id());
        let client = EvmClient::new(
            SignerMiddleware::new(provider, wallet.clone()),
            Network::Sepolia,
            U256::from(1_000_000_000u64),
        );
        (client, mock, wallet)
    }

    fn transfer_call() -> TransferCall {
        TransferCall {
            token: Address::repeat_byte(0x10),
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            value: U256::from(1_500_000u64),
        }
    }

    #[tokio::test]
    async fn fee_data_from_base_fee() {
        let (client, mock) = mocked();
        let block = Block::<H256> {
            base_fee_per_gas: Some(U256::from(10_000_000_000u64)),
            ..Block::default()
        };
        mock.push::<Block<H256>, _>(block).unwrap();

        let fees = client.fee_data().await.unwrap();
        assert!(fees.supports_eip1559());
        assert_eq!(fees.max_fee_per_gas, Some(U256::from(21_000_000_000u64)));
        assert_eq!(fees.max_priority_fee_per_gas, Some(U256::from(1_000_000_000u64)));
        assert_eq!(fees.gas_price, None);
    }

    #[tokio::test]
    async fn fee_data_falls_back_to_gas_price() {
        let (client, mock) = mocked();
        // responses are served last-in first-out
        mock.push::<U256, _>(U256::from(5_000_000_000u64)).unwrap();
        mock.push::<Block<H256>, _>(Block::default()).unwrap();

        let fees = client.fee_data().await.unwrap();
        assert!(!fees.supports_eip1559());
        assert_eq!(fees.gas_price, Some(U256::from(5_000_000_000u64)));
    }

    #[test]
    fn eip1559_plan_builds_typed_transaction() {
        let call = transfer_call();
        let sender = Address::repeat_byte(0xaa);
        let plan = FeePlan::from_fee_data(
            Some(U256::from(60_000)),
            &FeeData::eip1559(U256::from(30), U256::from(2)),
        );

        let tx = transfer_transaction(sender, &call, &plan);
        let TypedTransaction::Eip1559(inner) = &tx else {
            panic!("expected an EIP-1559 transaction, got {tx:?}");
        };
        assert_eq!(inner.max_fee_per_gas, Some(U256::from(30)));
        assert_eq!(inner.max_priority_fee_per_gas, Some(U256::from(2)));
        assert_eq!(tx.gas(), Some(&U256::from(60_000)));
        assert_eq!(tx.from(), Some(&sender));
        assert_eq!(tx.to_addr(), Some(&call.token));
        assert_eq!(
            tx.data(),
            Some(&erc20::encode_transfer_from(call.from, call.to, call.value))
        );
    }

    #[test]
    fn legacy_plan_builds_legacy_transaction() {
        let plan = FeePlan::from_fee_data(None, &FeeData::legacy(U256::from(7)));
        let tx = transfer_transaction(Address::repeat_byte(0xaa), &transfer_call(), &plan);

        let TypedTransaction::Legacy(inner) = &tx else {
            panic!("expected a legacy transaction, got {tx:?}");
        };
        assert_eq!(inner.gas_price, Some(U256::from(7)));
        assert_eq!(tx.gas(), None);
    }

    #[test]
    fn provider_defaults_leave_pricing_open() {
        let tx = transfer_transaction(
            Address::repeat_byte(0xaa),
            &transfer_call(),
            &FeePlan::provider_defaults(),
        );
        assert!(matches!(tx, TypedTransaction::Legacy(_)));
        assert_eq!(tx.gas_price(), None);
        assert_eq!(tx.gas(), None);
    }

    #[tokio::test]
    async fn send_signs_and_broadcasts_planned_transaction() {
        let (client, mock, wallet) = signing_client();
        let call = transfer_call();
        let plan = FeePlan::from_fee_data(
            Some(U256::from(60_000)),
            &FeeData::eip1559(U256::from(21_000_000_000u64), U256::from(1_000_000_000u64)),
        );
        let hash = H256::repeat_byte(0x5e);
        mock.push::<H256, _>(hash).unwrap();
        mock.push::<U256, _>(U256::from(7u64)).unwrap();

        assert_eq!(client.send_transfer(&call, &plan).await.unwrap(), hash);

        let mut expected = transfer_transaction(wallet.address(), &call, &plan);
        expected.set_chain_id(Network::Sepolia.chain_id());
        expected.set_nonce(U256::from(7u64));
        let signature = wallet.sign_transaction_sync(&expected).unwrap();

        mock.assert_request("eth_getTransactionCount", (wallet.address(), "latest"))
            .unwrap();
        mock.assert_request("eth_sendRawTransaction", [expected.rlp_signed(&signature)])
            .unwrap();
    }

    #[tokio::test]
    async fn send_rejection_is_classified() {
        let (client, mock, _wallet) = signing_client();
        mock.push_response(MockResponse::Error(JsonRpcError {
            code: -32000,
            message: "insufficient funds for gas * price + value".to_string(),
            data: None,
        }));
        mock.push::<U256, _>(U256::zero()).unwrap();

        let plan = FeePlan::from_fee_data(Some(U256::from(60_000)), &FeeData::legacy(U256::one()));
        let err = client.send_transfer(&transfer_call(), &plan).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RelayerUnderfunded);
    }

    #[tokio::test]
    async fn mined_receipt_reports_block() {
        let (client, mock, _wallet) = signing_client();
        let hash = H256::repeat_byte(0x77);
        mock.push::<TransactionReceipt, _>(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(42)),
            status: Some(U64::one()),
            ..TransactionReceipt::default()
        })
        .unwrap();
        mock.push::<Transaction, _>(Transaction {
            hash,
            block_number: Some(U64::from(42)),
            ..Transaction::default()
        })
        .unwrap();

        assert_eq!(client.wait_for_confirmation(hash).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn status_zero_receipt_is_call_reverted() {
        let (client, mock, _wallet) = signing_client();
        let hash = H256::repeat_byte(0x77);
        mock.push::<TransactionReceipt, _>(TransactionReceipt {
            transaction_hash: hash,
            block_number: Some(U64::from(42)),
            status: Some(U64::zero()),
            ..TransactionReceipt::default()
        })
        .unwrap();
        mock.push::<Transaction, _>(Transaction {
            hash,
            block_number: Some(U64::from(42)),
            ..Transaction::default()
        })
        .unwrap();

        let err = client.wait_for_confirmation(hash).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CallReverted);
        assert_eq!(err.details().unwrap().code.as_deref(), Some("CALL_EXCEPTION"));
    }

    #[tokio::test]
    async fn dropped_transaction_has_no_block() {
        let (client, mock, _wallet) = signing_client();
        for _ in 0..6 {
            mock.push::<Option<Transaction>, _>(None).unwrap();
        }

        let block = client
            .wait_for_confirmation(H256::repeat_byte(0x77))
            .await
            .unwrap();
        assert_eq!(block, None);
    }
}
