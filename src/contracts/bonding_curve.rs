use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::Serialize;

use crate::rpc::{ChainClient, ReceiptInfo, RpcError};
use crate::types::config::chain::ChainConfig;
use crate::util::formatting::{format_native_amount, format_native_fixed, serialize_u256_decimal};

sol! {
    interface IBondingCurveRouter {
        function create(
            string name,
            string symbol,
            string imageUri,
            string metadataUri,
            bytes32 salt
        ) external payable returns (address);
    }

    interface ICurve {
        function feeConfig() external view returns (uint256);
    }
}

const FEE_DISPLAY_DECIMALS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeConfig {
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub deploy_fee: U256,
    pub formatted_fee: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceCheck {
    pub sufficient: bool,
    pub balance: U256,
    pub required: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondingCurveCreateParams {
    pub name: String,
    pub symbol: String,
    pub image_uri: String,
    pub metadata_uri: String,
    /// Hex salt, with or without `0x`, at most 32 bytes.
    pub salt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenDeployment {
    pub token_address: Address,
    pub transaction_hash: B256,
}

/// Deploys tokens through the bonding-curve router and reads the curve's fee.
pub struct BondingCurveContract {
    chain: Arc<dyn ChainClient>,
    router: Address,
    curve: Address,
    native_symbol: String,
    native_decimals: u8,
}

impl BondingCurveContract {
    pub fn new(chain: Arc<dyn ChainClient>, config: &ChainConfig) -> Self {
        Self {
            chain,
            router: config.router_address,
            curve: config.curve_address,
            native_symbol: config.native_symbol.clone(),
            native_decimals: config.native_decimals,
        }
    }

    pub fn chain(&self) -> &Arc<dyn ChainClient> {
        &self.chain
    }

    pub fn router(&self) -> Address {
        self.router
    }

    pub fn curve(&self) -> Address {
        self.curve
    }

    pub fn format_native(&self, value: U256) -> String {
        format!(
            "{} {}",
            format_native_fixed(value, self.native_decimals, FEE_DISPLAY_DECIMALS),
            self.native_symbol
        )
    }

    /// Full-precision amount with the native symbol, for balances.
    pub fn format_native_exact(&self, value: U256) -> String {
        format_native_amount(value, self.native_decimals, &self.native_symbol)
    }

    /// Read the deployment fee from the curve's `feeConfig()`.
    ///
    /// Only the first 32-byte word of the return data is used, so a curve
    /// returning several fee values yields the first one.
    pub async fn get_deploy_fee(&self) -> Result<FeeConfig, RpcError> {
        let tx = TransactionRequest::default()
            .with_to(self.curve)
            .with_input(ICurve::feeConfigCall {}.abi_encode());

        let output = self.chain.call(tx).await?;
        if output.len() < 32 {
            return Err(RpcError::Decode(format!(
                "feeConfig() returned {} bytes, expected at least 32",
                output.len()
            )));
        }
        let deploy_fee = U256::from_be_slice(&output[..32]);

        Ok(FeeConfig {
            deploy_fee,
            formatted_fee: self.format_native(deploy_fee),
        })
    }

    /// Compare `address`'s native balance against the current deploy fee.
    pub async fn check_balance(&self, address: Address) -> Result<BalanceCheck, RpcError> {
        let balance = self.chain.get_balance(address).await?;
        let fee = self.get_deploy_fee().await?;
        tracing::debug!(
            "Balance of {} is {}, deploy fee {}",
            address,
            self.format_native_exact(balance),
            self.format_native_exact(fee.deploy_fee)
        );

        Ok(BalanceCheck {
            sufficient: balance >= fee.deploy_fee,
            balance,
            required: fee.deploy_fee,
        })
    }

    pub async fn create_token(
        &self,
        params: &BondingCurveCreateParams,
    ) -> Result<TokenDeployment, RpcError> {
        let fee = self.get_deploy_fee().await?;
        self.create_token_with_fee(params, fee.deploy_fee).await
    }

    /// Submit `create` with `fee` attached and resolve the deployed token address.
    pub async fn create_token_with_fee(
        &self,
        params: &BondingCurveCreateParams,
        fee: U256,
    ) -> Result<TokenDeployment, RpcError> {
        let sender = self.chain.account_address();
        let salt = normalize_salt(&params.salt)?;

        let call = IBondingCurveRouter::createCall {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            imageUri: params.image_uri.clone(),
            metadataUri: params.metadata_uri.clone(),
            salt,
        };
        let tx = TransactionRequest::default()
            .with_to(self.router)
            .with_input(call.abi_encode())
            .with_value(fee);

        let gas = self.chain.estimate_gas(tx.clone()).await?;
        tracing::debug!(
            "Estimated {} gas for create({}, {}) with fee {}",
            gas,
            params.name,
            params.symbol,
            self.format_native(fee)
        );

        let tx_hash = self.chain.send_transaction(tx.with_gas_limit(gas)).await?;
        tracing::info!("Submitted token creation transaction {}", tx_hash);

        let receipt = self.chain.wait_for_receipt(tx_hash).await?;
        if !receipt.status {
            return Err(RpcError::TransactionReverted { tx_hash });
        }

        let token_address = extract_token_address(&receipt, sender)?;
        tracing::info!("Token {} deployed in {}", token_address, tx_hash);

        Ok(TokenDeployment {
            token_address,
            transaction_hash: tx_hash,
        })
    }
}

/// Left-pad a hex salt to 32 bytes. Accepts an optional `0x` prefix.
pub fn normalize_salt(salt: &str) -> Result<B256, RpcError> {
    let hex = salt.trim().trim_start_matches("0x");
    if hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RpcError::Decode(format!("Invalid salt: {}", salt)));
    }
    format!("{:0>64}", hex)
        .parse::<B256>()
        .map_err(|e| RpcError::Decode(format!("Invalid salt {}: {}", salt, e)))
}

/// Find the deployed token address in a creation receipt.
///
/// Prefers the receipt's contract address. Otherwise takes the first indexed
/// topic (never topic0) that holds a left-padded non-zero address other than
/// `sender`.
pub fn extract_token_address(
    receipt: &ReceiptInfo,
    sender: Option<Address>,
) -> Result<Address, RpcError> {
    if let Some(address) = receipt.contract_address {
        return Ok(address);
    }

    for log in &receipt.logs {
        for topic in log.topics.iter().skip(1) {
            if topic[..12].iter().any(|b| *b != 0) {
                continue;
            }
            let candidate = Address::from_slice(&topic[12..]);
            if candidate == Address::ZERO || Some(candidate) == sender {
                continue;
            }
            return Ok(candidate);
        }
    }

    tracing::warn!(
        "No token address found in receipt of {} ({} logs)",
        receipt.transaction_hash,
        receipt.logs.len()
    );
    Err(RpcError::AddressNotFound {
        tx_hash: receipt.transaction_hash,
    })
}

impl std::fmt::Debug for BondingCurveContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BondingCurveContract")
            .field("router", &self.router)
            .field("curve", &self.curve)
            .field("native_symbol", &self.native_symbol)
            .finish()
    }
}
