//! HTTP surface over the agent, the launchpad API and the creation flow.

mod error;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::agent::AgentPersonality;
use crate::contracts::BondingCurveContract;
use crate::nadfun::LaunchpadApi;
use crate::types::config::server::ServerConfig;

pub use error::ServerError;

/// Services shared by every request. Creation flows are built per request
/// from these.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn LaunchpadApi>,
    pub contract: Arc<BondingCurveContract>,
    pub agent: Arc<AgentPersonality>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn LaunchpadApi>,
        contract: Arc<BondingCurveContract>,
        agent: AgentPersonality,
    ) -> Self {
        Self {
            api,
            contract,
            agent: Arc::new(agent),
        }
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(routes::chat))
        .route("/suggestions", get(routes::suggestions))
        .route("/mine-salt", post(routes::mine_salt))
        .route("/token-status", get(routes::token_status))
        .route("/deploy-fee", get(routes::deploy_fee))
        .route("/create-token", post(routes::create_token))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, router(state, config))
        .await
        .context("HTTP server exited")
}
