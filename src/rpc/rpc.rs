use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::TransportError;
use async_trait::async_trait;
use governor::clock::{QuantaClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Jitter, Quota, RateLimiter};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{message}")]
    Provider { message: String, code: Option<i64> },

    #[error("Wallet not initialized")]
    WalletNotInitialized,

    #[error("Invalid private key: {0}")]
    InvalidSigner(String),

    #[error("Timed out after {timeout:?} waiting for receipt of transaction {tx_hash}")]
    Timeout { timeout: Duration, tx_hash: B256 },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: B256 },

    #[error(
        "Transaction successful (hash: {tx_hash}) but could not extract token address automatically. \
         Check the transaction logs on the block explorer; the token was likely created."
    )]
    AddressNotFound { tx_hash: B256 },
}

impl RpcError {
    /// JSON-RPC error code, when the node returned one.
    pub fn code(&self) -> Option<i64> {
        match self {
            RpcError::Provider { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            RpcError::WalletNotInitialized | RpcError::InvalidSigner(_) | RpcError::InvalidUrl(_)
        )
    }

    fn from_transport(operation: &str, e: TransportError) -> Self {
        if let Some(payload) = e.as_error_resp() {
            return RpcError::Provider {
                message: format!("{} failed: {}", operation, payload.message),
                code: Some(payload.code),
            };
        }
        RpcError::Transport(format!("{} failed: {}", operation, error_chain(&e)))
    }
}

/// Flatten an error and its sources into one line.
pub fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let inner_msg = inner.to_string();
        if !msg.contains(&inner_msg) {
            msg.push_str(": ");
            msg.push_str(&inner_msg);
        }
        source = inner.source();
    }
    msg
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
}

/// The parts of a mined transaction's receipt that callers inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptInfo {
    pub transaction_hash: B256,
    pub status: bool,
    pub contract_address: Option<Address>,
    pub logs: Vec<ReceiptLog>,
}

impl From<&TransactionReceipt> for ReceiptInfo {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash(),
            status: receipt.status(),
            contract_address: receipt.contract_address(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| ReceiptLog {
                    address: log.address(),
                    topics: log.topics().to_vec(),
                })
                .collect(),
        }
    }
}

/// Blockchain node access used by the contract adapter.
///
/// Read operations work without a signer. `estimate_gas` and
/// `send_transaction` fail with [`RpcError::WalletNotInitialized`] before
/// any request is made when no signing identity is configured.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the configured signer, if any.
    fn account_address(&self) -> Option<Address>;

    async fn get_balance(&self, address: Address) -> Result<U256, RpcError>;

    async fn get_gas_price(&self) -> Result<u128, RpcError>;

    async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64, RpcError>;

    /// Read-only `eth_call` against the latest block.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, RpcError>;

    /// Sign and broadcast, returning the transaction hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, RpcError>;

    /// Suspend until the transaction is mined.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ReceiptInfo, RpcError>;
}

pub type StandardRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub url: Url,
    pub rate_limit: Option<RateLimitConfig>,
    pub receipt_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: NonZeroU32,
    pub jitter_min_ms: u64,
    pub jitter_max_ms: u64,
}

impl RateLimitConfig {
    pub fn per_second(requests_per_second: NonZeroU32) -> Self {
        Self {
            requests_per_second,
            ..Default::default()
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: NonZeroU32::MIN.saturating_add(9),
            jitter_min_ms: 5,
            jitter_max_ms: 50,
        }
    }
}

impl RpcClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            rate_limit: None,
            receipt_timeout: Duration::from_secs(120),
            receipt_poll_interval: Duration::from_millis(500),
        }
    }

    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    pub fn with_receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = interval;
        self
    }
}

pub struct RpcClient {
    provider: DynProvider,
    account: Option<Address>,
    config: RpcClientConfig,
    rate_limiter: Option<Arc<StandardRateLimiter>>,
    jitter: Option<Jitter>,
}

impl RpcClient {
    /// Build a client. With a signer, transactions are signed locally by a
    /// wallet filler; the signer cannot be replaced afterwards.
    pub fn new(config: RpcClientConfig, signer: Option<PrivateKeySigner>) -> Result<Self, RpcError> {
        let account = signer.as_ref().map(|s| s.address());
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(config.url.clone())
                .erased(),
            None => ProviderBuilder::new()
                .connect_http(config.url.clone())
                .erased(),
        };

        let (rate_limiter, jitter) = if let Some(ref rate_config) = config.rate_limit {
            let quota = Quota::per_second(rate_config.requests_per_second);
            let limiter = RateLimiter::direct(quota);
            let jitter = Jitter::new(
                Duration::from_millis(rate_config.jitter_min_ms),
                Duration::from_millis(rate_config.jitter_max_ms),
            );
            (Some(Arc::new(limiter)), Some(jitter))
        } else {
            (None, None)
        };

        Ok(Self {
            provider,
            account,
            config,
            rate_limiter,
            jitter,
        })
    }

    pub fn from_url(url: &str) -> Result<Self, RpcError> {
        let url = Url::parse(url).map_err(|e| RpcError::InvalidUrl(e.to_string()))?;
        Self::new(RpcClientConfig::new(url), None)
    }

    /// Build a client signing with `private_key` (hex, `0x` prefix optional).
    pub fn with_private_key(config: RpcClientConfig, private_key: &str) -> Result<Self, RpcError> {
        Self::new(config, Some(parse_signer(private_key)?))
    }

    pub fn config(&self) -> &RpcClientConfig {
        &self.config
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    async fn wait_for_rate_limit(&self) {
        if let (Some(limiter), Some(jitter)) = (&self.rate_limiter, &self.jitter) {
            limiter.until_ready_with_jitter(*jitter).await;
        }
    }

    pub async fn get_chain_id(&self) -> Result<u64, RpcError> {
        self.wait_for_rate_limit().await;
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| RpcError::from_transport("eth_chainId", e))
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.wait_for_rate_limit().await;
        self.provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| RpcError::from_transport("eth_getTransactionReceipt", e))
    }

    fn require_account(&self) -> Result<Address, RpcError> {
        self.account.ok_or(RpcError::WalletNotInitialized)
    }
}

pub fn parse_signer(private_key: &str) -> Result<PrivateKeySigner, RpcError> {
    let key = private_key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    PrivateKeySigner::from_str(key).map_err(|e| RpcError::InvalidSigner(e.to_string()))
}

#[async_trait]
impl ChainClient for RpcClient {
    fn account_address(&self) -> Option<Address> {
        self.account
    }

    async fn get_balance(&self, address: Address) -> Result<U256, RpcError> {
        self.wait_for_rate_limit().await;
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| RpcError::from_transport("eth_getBalance", e))
    }

    async fn get_gas_price(&self) -> Result<u128, RpcError> {
        self.wait_for_rate_limit().await;
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| RpcError::from_transport("eth_gasPrice", e))
    }

    async fn estimate_gas(&self, mut tx: TransactionRequest) -> Result<u64, RpcError> {
        tx.from = Some(self.require_account()?);
        self.wait_for_rate_limit().await;
        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| RpcError::from_transport("eth_estimateGas", e))
    }

    async fn call(&self, tx: TransactionRequest) -> Result<Bytes, RpcError> {
        self.wait_for_rate_limit().await;
        self.provider
            .call(tx)
            .await
            .map_err(|e| RpcError::from_transport("eth_call", e))
    }

    async fn send_transaction(&self, mut tx: TransactionRequest) -> Result<B256, RpcError> {
        tx.from = Some(self.require_account()?);
        self.wait_for_rate_limit().await;
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| RpcError::from_transport("eth_sendRawTransaction", e))?;
        let tx_hash = *pending.tx_hash();
        tracing::info!("Submitted transaction {}", tx_hash);
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ReceiptInfo, RpcError> {
        let timeout = self.config.receipt_timeout;
        let poll = async {
            let mut interval = tokio::time::interval(self.config.receipt_poll_interval);
            loop {
                interval.tick().await;
                if let Some(receipt) = self.get_transaction_receipt(tx_hash).await? {
                    return Ok::<_, RpcError>(ReceiptInfo::from(&receipt));
                }
                tracing::debug!("Receipt for {} not available yet", tx_hash);
            }
        };

        match tokio::time::timeout(timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout { timeout, tx_hash }),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("config", &self.config)
            .field("account", &self.account)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish()
    }
}
