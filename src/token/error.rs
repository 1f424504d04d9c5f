use alloy::primitives::U256;
use thiserror::Error;

use crate::nadfun::ApiError;
use crate::rpc::RpcError;
use crate::util::validation::ValidationError;

/// Why a single creation step failed.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("Insufficient balance. Required: {required}, Available: {available}")]
    InsufficientBalance { required: U256, available: U256 },
}

impl StepFailure {
    /// Service or JSON-RPC error code, when one was reported.
    pub fn code(&self) -> Option<String> {
        match self {
            StepFailure::Api(e) => e.code.clone(),
            StepFailure::Rpc(e) => e.code().map(|c| c.to_string()),
            _ => None,
        }
    }

    /// True when the failure is the caller's fault rather than a downstream one.
    ///
    /// A 4xx from the launch platform still counts as downstream: the caller's
    /// input already passed validation before any step ran.
    pub fn is_client_error(&self) -> bool {
        match self {
            StepFailure::Validation(_) | StepFailure::InsufficientBalance { .. } => true,
            StepFailure::Api(_) | StepFailure::Rpc(_) => false,
        }
    }
}

/// A creation attempt that stopped at `step`.
#[derive(Debug, Error)]
#[error("Step {step} failed: {source}")]
pub struct TokenCreationError {
    pub step: u8,
    #[source]
    pub source: StepFailure,
}

impl TokenCreationError {
    pub fn new(step: u8, source: impl Into<StepFailure>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }

    /// The failure message without the step prefix, as shown on the step itself.
    pub fn message(&self) -> String {
        self.source.to_string()
    }
}
