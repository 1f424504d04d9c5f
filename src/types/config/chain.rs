use std::env;
use std::time::Duration;

use alloy::primitives::{address, Address};
use serde::Deserialize;

/// Chain, wallet and contract settings.
///
/// Secrets are never stored in the config file itself: the RPC URL and the
/// signer's private key are read from the environment variables named here.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_name")]
    pub name: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_rpc_url_env_var")]
    pub rpc_url_env_var: String,

    /// Used when `rpc_url_env_var` is unset. `None` makes the env var mandatory.
    #[serde(default = "default_fallback_rpc_url")]
    pub fallback_rpc_url: Option<String>,

    #[serde(default = "default_private_key_env_var")]
    pub private_key_env_var: String,

    #[serde(default = "default_native_symbol")]
    pub native_symbol: String,

    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,

    #[serde(default = "default_router_address")]
    pub router_address: Address,

    #[serde(default = "default_curve_address")]
    pub curve_address: Address,

    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,

    /// Client-side cap on outgoing RPC requests. Unlimited when absent.
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

fn default_chain_name() -> String {
    "Monad Testnet".to_string()
}

fn default_chain_id() -> u64 {
    10143
}

fn default_rpc_url_env_var() -> String {
    "MONAD_RPC_URL".to_string()
}

fn default_fallback_rpc_url() -> Option<String> {
    Some("https://testnet-rpc.monad.xyz".to_string())
}

fn default_private_key_env_var() -> String {
    "PRIVATE_KEY".to_string()
}

fn default_native_symbol() -> String {
    "MON".to_string()
}

fn default_native_decimals() -> u8 {
    18
}

fn default_router_address() -> Address {
    address!("6f6b8f1a20703309951a5127c45b49b1cd981a22")
}

fn default_curve_address() -> Address {
    address!("a7283d07812a02afb7c09b60f8896bcea3f90ace")
}

fn default_receipt_timeout_secs() -> u64 {
    120
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            name: default_chain_name(),
            chain_id: default_chain_id(),
            rpc_url_env_var: default_rpc_url_env_var(),
            fallback_rpc_url: default_fallback_rpc_url(),
            private_key_env_var: default_private_key_env_var(),
            native_symbol: default_native_symbol(),
            native_decimals: default_native_decimals(),
            router_address: default_router_address(),
            curve_address: default_curve_address(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            requests_per_second: None,
        }
    }
}

impl ChainConfig {
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    /// RPC URL from the environment, falling back to the configured default.
    pub fn resolve_rpc_url(&self) -> Option<String> {
        env::var(&self.rpc_url_env_var)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.fallback_rpc_url.clone())
    }

    pub fn resolve_private_key(&self) -> Option<String> {
        env::var(&self.private_key_env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
