use std::env;
use std::time::Duration;

use serde::Deserialize;

/// Settings for the launch platform's REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchpadConfig {
    #[serde(default = "default_api_url_env_var")]
    pub api_url_env_var: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url_env_var() -> String {
    "NAD_FUN_API_URL".to_string()
}

fn default_base_url() -> String {
    "https://dev-api.nad.fun".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            api_url_env_var: default_api_url_env_var(),
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl LaunchpadConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn resolve_base_url(&self) -> String {
        env::var(&self.api_url_env_var)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone())
    }
}
