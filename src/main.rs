use std::env;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use url::Url;

use token_genie_rs::agent::AgentPersonality;
use token_genie_rs::contracts::BondingCurveContract;
use token_genie_rs::nadfun::NadFunClient;
use token_genie_rs::rpc::{parse_signer, ChainClient, RateLimitConfig, RpcClient, RpcClientConfig};
use token_genie_rs::server::{self, AppState};
use token_genie_rs::types::config::app::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "config/config.json".to_string());
    let config = AppConfig::load(Path::new(&config_path))?;
    load_env_vars(&config)?;

    tracing::info!(
        "Loaded config for {} (chain id {})",
        config.chain.name,
        config.chain.chain_id
    );

    let state = build_state(&config).await?;
    server::serve(state, &config.server).await
}

/// Ensures required env vars are set, loading .env when any known var is
/// missing. Optional vars (private key, API override) may stay unset.
fn load_env_vars(config: &AppConfig) -> anyhow::Result<()> {
    let required = config.required_env_vars();
    let missing: Vec<&str> = config
        .optional_env_vars()
        .into_iter()
        .chain(required.iter().copied())
        .filter(|var| env::var(var).is_err())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded env vars from {}", path.display()),
        Err(e) if required.iter().all(|var| env::var(var).is_ok()) => {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Missing env vars {:?} and failed to load .env file", required)
            })
        }
    }

    let still_missing: Vec<&str> = required
        .iter()
        .filter(|var| env::var(var).is_err())
        .copied()
        .collect();

    anyhow::ensure!(
        still_missing.is_empty(),
        "Missing required env vars after loading .env: {:?}",
        still_missing
    );

    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let chain = &config.chain;

    let rpc_url = chain.resolve_rpc_url().with_context(|| {
        format!(
            "No RPC URL: set {} or chain.fallback_rpc_url",
            chain.rpc_url_env_var
        )
    })?;
    let url = Url::parse(&rpc_url).with_context(|| format!("Invalid RPC URL {}", rpc_url))?;

    let mut rpc_config = RpcClientConfig::new(url).with_receipt_timeout(chain.receipt_timeout());
    if let Some(rps) = chain.requests_per_second.and_then(NonZeroU32::new) {
        rpc_config = rpc_config.with_rate_limit(RateLimitConfig::per_second(rps));
    }

    let signer = match chain.resolve_private_key() {
        Some(key) => Some(
            parse_signer(&key)
                .with_context(|| format!("Invalid key in {}", chain.private_key_env_var))?,
        ),
        None => {
            tracing::warn!(
                "{} not set; token creation will fail until a signer is configured",
                chain.private_key_env_var
            );
            None
        }
    };

    let rpc = RpcClient::new(rpc_config, signer)?;
    if let Some(account) = rpc.account_address() {
        tracing::info!("Signing as {}", account);
    }

    match rpc.get_chain_id().await {
        Ok(id) if id == chain.chain_id => tracing::info!("Connected to chain {}", id),
        Ok(id) => tracing::warn!(
            "RPC reports chain id {} but config expects {}",
            id,
            chain.chain_id
        ),
        Err(e) => tracing::warn!("Could not verify chain id: {}", e),
    }

    let api = NadFunClient::new(
        &config.launchpad.resolve_base_url(),
        config.launchpad.request_timeout(),
    )?;
    tracing::info!("Using launchpad API at {}", api.base_url());

    let contract = BondingCurveContract::new(Arc::new(rpc), chain);
    let agent = AgentPersonality::new(config.agent.name.clone(), config.agent.personality);

    Ok(AppState::new(Arc::new(api), Arc::new(contract), agent))
}
