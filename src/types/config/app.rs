use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::types::config::chain::ChainConfig;
use crate::types::config::launchpad::LaunchpadConfig;
use crate::types::config::server::{AgentConfig, ServerConfig};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub launchpad: LaunchpadConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        anyhow::ensure!(
            config.chain.native_decimals <= 36,
            "native_decimals {} is out of range",
            config.chain.native_decimals
        );
        Ok(config)
    }

    /// Env vars without which the service cannot start.
    pub fn required_env_vars(&self) -> Vec<&str> {
        let mut required = Vec::new();
        if self.chain.fallback_rpc_url.is_none() {
            required.push(self.chain.rpc_url_env_var.as_str());
        }
        required
    }

    /// Env vars that are read when present.
    pub fn optional_env_vars(&self) -> Vec<&str> {
        vec![
            self.chain.rpc_url_env_var.as_str(),
            self.chain.private_key_env_var.as_str(),
            self.launchpad.api_url_env_var.as_str(),
        ]
    }
}
