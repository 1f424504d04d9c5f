//! In-memory fakes of the launchpad API and the chain client.
//!
//! Both record every call so tests can assert which collaborators were
//! reached and in what order.

use std::sync::Mutex;

use alloy::primitives::{address, Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;

use crate::nadfun::{ApiError, LaunchpadApi};
use crate::rpc::{ChainClient, ReceiptInfo, ReceiptLog, RpcError};
use crate::types::nadfun::{SaltResponse, TokenState, TokenStatus};
use crate::types::token::{ImagePayload, TokenMetadata};

pub const SIGNER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const TOKEN: Address = address!("1234567890abcdef1234567890abcdef12347777");
pub const ONE_MON: u128 = 1_000_000_000_000_000_000;

pub fn padded(address: Address) -> B256 {
    address.into_word()
}

pub fn png(len: usize) -> ImagePayload {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.resize(len.max(8), 0);
    ImagePayload::new(bytes, "token.png", "image/png")
}

#[derive(Debug, Default)]
pub struct FakeLaunchpad {
    pub fail_image: bool,
    pub fail_metadata: bool,
    pub fail_salt: bool,
    calls: Mutex<Vec<&'static str>>,
    uploaded_metadata: Mutex<Option<TokenMetadata>>,
}

impl FakeLaunchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploaded_metadata(&self) -> Option<TokenMetadata> {
        self.uploaded_metadata.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LaunchpadApi for FakeLaunchpad {
    async fn upload_image(&self, image: &ImagePayload) -> Result<String, ApiError> {
        self.record("upload_image");
        if self.fail_image {
            return Err(ApiError::new("image storage unavailable").with_status(502));
        }
        Ok(format!("ipfs://image/{}", image.file_name))
    }

    async fn upload_metadata(&self, metadata: &TokenMetadata) -> Result<String, ApiError> {
        self.record("upload_metadata");
        if self.fail_metadata {
            return Err(ApiError::new("metadata rejected")
                .with_status(400)
                .with_code("INVALID_METADATA"));
        }
        *self.uploaded_metadata.lock().unwrap() = Some(metadata.clone());
        Ok(format!("ipfs://metadata/{}", metadata.symbol))
    }

    async fn mine_salt(&self) -> Result<SaltResponse, ApiError> {
        self.record("mine_salt");
        if self.fail_salt {
            return Err(ApiError::new("Failed to mine salt").with_status(500));
        }
        Ok(SaltResponse {
            salt: "0x2a".to_string(),
            address: TOKEN.to_string(),
        })
    }

    async fn get_token_status(&self, address: &str) -> Result<TokenStatus, ApiError> {
        self.record("get_token_status");
        Ok(TokenStatus {
            address: address.to_string(),
            name: "CosmicChaos".to_string(),
            symbol: "COSMIC".to_string(),
            image_uri: "ipfs://image/token.png".to_string(),
            metadata_uri: "ipfs://metadata/COSMIC".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            status: TokenState::Active,
        })
    }
}

#[derive(Debug)]
pub struct FakeChain {
    pub account: Option<Address>,
    pub balance: U256,
    pub fee_return: Bytes,
    pub receipt: ReceiptInfo,
    pub fail_fee_read: bool,
    pub fail_send: bool,
    calls: Mutex<Vec<&'static str>>,
    sent: Mutex<Vec<TransactionRequest>>,
}

impl FakeChain {
    /// A funded signer, a 1 MON fee, and a receipt whose log carries
    /// [`TOKEN`] as an indexed topic.
    pub fn new() -> Self {
        let fee = U256::from(ONE_MON);
        Self {
            account: Some(SIGNER),
            balance: U256::from(5 * ONE_MON),
            fee_return: Bytes::from(fee.to_be_bytes::<32>().to_vec()),
            receipt: ReceiptInfo {
                transaction_hash: Self::tx_hash(),
                status: true,
                contract_address: None,
                logs: vec![ReceiptLog {
                    address: Address::repeat_byte(0x11),
                    topics: vec![B256::repeat_byte(0xee), padded(TOKEN), padded(SIGNER)],
                }],
            },
            fail_fee_read: false,
            fail_send: false,
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn tx_hash() -> B256 {
        B256::repeat_byte(0x5a)
    }

    pub fn without_account(mut self) -> Self {
        self.account = None;
        self
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_fee(mut self, fee: U256) -> Self {
        self.fee_return = Bytes::from(fee.to_be_bytes::<32>().to_vec());
        self
    }

    pub fn with_receipt(mut self, receipt: ReceiptInfo) -> Self {
        self.receipt = receipt;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    fn account_address(&self) -> Option<Address> {
        self.account
    }

    async fn get_balance(&self, _address: Address) -> Result<U256, RpcError> {
        self.record("get_balance");
        Ok(self.balance)
    }

    async fn get_gas_price(&self) -> Result<u128, RpcError> {
        self.record("get_gas_price");
        Ok(50_000_000_000)
    }

    async fn estimate_gas(&self, _tx: TransactionRequest) -> Result<u64, RpcError> {
        self.record("estimate_gas");
        self.account.ok_or(RpcError::WalletNotInitialized)?;
        Ok(2_500_000)
    }

    async fn call(&self, _tx: TransactionRequest) -> Result<Bytes, RpcError> {
        self.record("call");
        if self.fail_fee_read {
            return Err(RpcError::Provider {
                message: "eth_call failed: execution reverted".to_string(),
                code: Some(3),
            });
        }
        Ok(self.fee_return.clone())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, RpcError> {
        self.record("send_transaction");
        self.account.ok_or(RpcError::WalletNotInitialized)?;
        if self.fail_send {
            return Err(RpcError::Provider {
                message: "eth_sendRawTransaction failed: nonce too low".to_string(),
                code: Some(-32000),
            });
        }
        self.sent.lock().unwrap().push(tx);
        Ok(Self::tx_hash())
    }

    async fn wait_for_receipt(&self, _tx_hash: B256) -> Result<ReceiptInfo, RpcError> {
        self.record("wait_for_receipt");
        Ok(self.receipt.clone())
    }
}
