use std::sync::Arc;

use alloy::primitives::{Address, B256};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;

use crate::contracts::{BondingCurveContract, BondingCurveCreateParams};
use crate::nadfun::LaunchpadApi;
use crate::rpc::RpcError;
use crate::token::error::{StepFailure, TokenCreationError};
use crate::token::image::validate_image;
use crate::token::metadata::generate_token_metadata;
use crate::types::token::{
    TokenCreationParams, TokenCreationProgress, STEP_CREATE_ON_CHAIN, STEP_MINE_SALT,
    STEP_UPLOAD_IMAGE, STEP_UPLOAD_METADATA,
};
use crate::util::validation::ValidationError;

/// Runs the four creation steps for one token.
///
/// Each instance drives a single attempt at a time (`create_token` takes
/// `&mut self`). Progress is published on a watch channel; `subscribe` hands
/// out receivers that see every step transition.
pub struct TokenCreator {
    api: Arc<dyn LaunchpadApi>,
    contract: Arc<BondingCurveContract>,
    rng: StdRng,
    progress: watch::Sender<TokenCreationProgress>,
    transaction_hash: Option<B256>,
}

impl TokenCreator {
    pub fn new(api: Arc<dyn LaunchpadApi>, contract: Arc<BondingCurveContract>) -> Self {
        Self::with_rng(api, contract, StdRng::from_entropy())
    }

    pub fn with_rng(
        api: Arc<dyn LaunchpadApi>,
        contract: Arc<BondingCurveContract>,
        rng: StdRng,
    ) -> Self {
        let (progress, _) = watch::channel(TokenCreationProgress::new());
        Self {
            api,
            contract,
            rng,
            progress,
            transaction_hash: None,
        }
    }

    pub fn progress(&self) -> TokenCreationProgress {
        self.progress.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TokenCreationProgress> {
        self.progress.subscribe()
    }

    /// Hash of the creation transaction from the last successful attempt.
    pub fn transaction_hash(&self) -> Option<B256> {
        self.transaction_hash
    }

    pub fn reset(&mut self) {
        self.transaction_hash = None;
        self.progress.send_replace(TokenCreationProgress::new());
    }

    /// Upload image and metadata, mine a salt, then deploy on-chain.
    ///
    /// `params` is filled in with each step's output. On failure the failing
    /// step is marked `error` and no later step runs.
    pub async fn create_token(
        &mut self,
        params: &mut TokenCreationParams,
    ) -> Result<Address, TokenCreationError> {
        tracing::info!("Creating token {} ({})", params.name, params.symbol);

        match self.run_steps(params).await {
            Ok(address) => {
                self.progress.send_modify(|p| p.finish(address));
                tracing::info!("Token {} created at {}", params.name, address);
                Ok(address)
            }
            Err(e) => {
                let message = e.message();
                self.progress.send_modify(|p| p.fail(e.step, message));
                tracing::error!("Token creation failed at step {}: {}", e.step, e.message());
                Err(e)
            }
        }
    }

    async fn run_steps(
        &mut self,
        params: &mut TokenCreationParams,
    ) -> Result<Address, TokenCreationError> {
        self.upload_image(params)
            .await
            .map_err(|e| TokenCreationError::new(STEP_UPLOAD_IMAGE, e))?;
        self.upload_metadata(params)
            .await
            .map_err(|e| TokenCreationError::new(STEP_UPLOAD_METADATA, e))?;
        self.mine_salt(params)
            .await
            .map_err(|e| TokenCreationError::new(STEP_MINE_SALT, e))?;
        self.create_on_chain(params)
            .await
            .map_err(|e| TokenCreationError::new(STEP_CREATE_ON_CHAIN, e))
    }

    fn start(&self, step: u8, message: &str) {
        tracing::debug!("Step {}: {}", step, message);
        self.progress.send_modify(|p| p.start(step, message));
    }

    fn complete(&self, step: u8, message: String) {
        tracing::info!("Step {}: {}", step, message);
        self.progress.send_modify(|p| p.complete(step, message));
    }

    async fn upload_image(&mut self, params: &mut TokenCreationParams) -> Result<(), StepFailure> {
        self.start(STEP_UPLOAD_IMAGE, "Uploading image...");

        let image = params
            .image
            .as_ref()
            .ok_or_else(|| ValidationError::missing("Image file"))?;
        validate_image(image)?;

        let image_uri = self.api.upload_image(image).await?;
        self.complete(STEP_UPLOAD_IMAGE, format!("Image uploaded: {}", image_uri));
        params.image_uri = Some(image_uri);
        Ok(())
    }

    async fn upload_metadata(
        &mut self,
        params: &mut TokenCreationParams,
    ) -> Result<(), StepFailure> {
        self.start(STEP_UPLOAD_METADATA, "Uploading metadata...");

        let image_uri = params
            .image_uri
            .as_deref()
            .ok_or_else(|| ValidationError::missing("Image URI"))?;

        let metadata = generate_token_metadata(
            &mut self.rng,
            &params.name,
            &params.symbol,
            &params.description,
            image_uri,
            params.theme.as_deref(),
        );

        let metadata_uri = self.api.upload_metadata(&metadata).await?;
        self.complete(
            STEP_UPLOAD_METADATA,
            format!("Metadata uploaded: {}", metadata_uri),
        );
        params.metadata_uri = Some(metadata_uri);
        Ok(())
    }

    async fn mine_salt(&mut self, params: &mut TokenCreationParams) -> Result<(), StepFailure> {
        self.start(STEP_MINE_SALT, "Mining salt for vanity address...");

        let mined = self.api.mine_salt().await?;
        self.complete(STEP_MINE_SALT, format!("Salt mined: {}", mined.address));
        params.salt = Some(mined.salt);
        params.vanity_address = Some(mined.address);
        Ok(())
    }

    async fn create_on_chain(
        &mut self,
        params: &mut TokenCreationParams,
    ) -> Result<Address, StepFailure> {
        self.start(STEP_CREATE_ON_CHAIN, "Creating token on-chain...");

        let (image_uri, metadata_uri, salt) =
            match (&params.image_uri, &params.metadata_uri, &params.salt) {
                (Some(image), Some(metadata), Some(salt)) => {
                    (image.clone(), metadata.clone(), salt.clone())
                }
                _ => {
                    return Err(ValidationError::invalid(
                        "params",
                        "Missing required parameters for on-chain creation",
                    )
                    .into())
                }
            };

        let account = self
            .contract
            .chain()
            .account_address()
            .ok_or(RpcError::WalletNotInitialized)?;

        let balance = self.contract.check_balance(account).await?;
        if !balance.sufficient {
            return Err(StepFailure::InsufficientBalance {
                required: balance.required,
                available: balance.balance,
            });
        }

        let create = BondingCurveCreateParams {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            image_uri,
            metadata_uri,
            salt,
        };
        let deployment = self
            .contract
            .create_token_with_fee(&create, balance.required)
            .await?;

        self.transaction_hash = Some(deployment.transaction_hash);
        self.complete(
            STEP_CREATE_ON_CHAIN,
            format!("Token created at: {}", deployment.token_address),
        );
        Ok(deployment.token_address)
    }
}

impl std::fmt::Debug for TokenCreator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCreator")
            .field("contract", &self.contract)
            .field("progress", &*self.progress.borrow())
            .finish()
    }
}
