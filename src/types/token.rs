//! Token creation domain types.
//!
//! `TokenCreationProgress` is a plain state machine value: the orchestrator
//! owns the only mutable copy and publishes clones to observers.

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STEP_UPLOAD_IMAGE: u8 = 1;
pub const STEP_UPLOAD_METADATA: u8 = 2;
pub const STEP_MINE_SALT: u8 = 3;
pub const STEP_CREATE_ON_CHAIN: u8 = 4;

pub const STEP_NAMES: [&str; 4] = [
    "Upload Image",
    "Upload Metadata",
    "Mine Salt",
    "Create On-Chain",
];

/// Raw image bytes as received from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Inputs of one creation attempt, filled in as steps complete.
#[derive(Debug, Clone, Default)]
pub struct TokenCreationParams {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub theme: Option<String>,
    pub image: Option<ImagePayload>,
    pub image_uri: Option<String>,
    pub metadata_uri: Option<String>,
    pub salt: Option<String>,
    pub vanity_address: Option<String>,
}

impl TokenCreationParams {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        description: impl Into<String>,
        image: Option<ImagePayload>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            description: description.into(),
            image,
            ..Default::default()
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreationStep {
    pub step: u8,
    pub name: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCreationProgress {
    pub current_step: u8,
    pub steps: Vec<TokenCreationStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for TokenCreationProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCreationProgress {
    pub fn new() -> Self {
        let steps = STEP_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| TokenCreationStep {
                step: i as u8 + 1,
                name: name.to_string(),
                status: StepStatus::Pending,
                message: None,
            })
            .collect();

        Self {
            current_step: 0,
            steps,
            token_address: None,
            error: None,
        }
    }

    pub fn step(&self, step: u8) -> Option<&TokenCreationStep> {
        self.steps.iter().find(|s| s.step == step)
    }

    pub fn status_of(&self, step: u8) -> Option<StepStatus> {
        self.step(step).map(|s| s.status)
    }

    fn set(&mut self, step: u8, status: StepStatus, message: Option<String>) {
        if let Some(entry) = self.steps.iter_mut().find(|s| s.step == step) {
            entry.status = status;
            entry.message = message;
            self.current_step = step;
        }
    }

    pub fn start(&mut self, step: u8, message: impl Into<String>) {
        self.set(step, StepStatus::InProgress, Some(message.into()));
    }

    pub fn complete(&mut self, step: u8, message: impl Into<String>) {
        self.set(step, StepStatus::Completed, Some(message.into()));
    }

    pub fn fail(&mut self, step: u8, message: impl Into<String>) {
        let message = message.into();
        self.set(step, StepStatus::Error, Some(message.clone()));
        self.error = Some(message);
    }

    pub fn finish(&mut self, token_address: Address) {
        for step in self.steps.iter_mut() {
            step.status = StepStatus::Completed;
        }
        self.token_address = Some(token_address);
    }

    /// True once a step failed or the final step completed.
    pub fn is_terminal(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Error)
            || self.status_of(STEP_CREATE_ON_CHAIN) == Some(StepStatus::Completed)
    }

    pub fn in_progress(&self) -> Option<&TokenCreationStep> {
        self.steps.iter().find(|s| s.status == StepStatus::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

impl TokenAttribute {
    pub fn text(trait_type: &str, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: AttributeValue::Text(value.into()),
        }
    }

    pub fn number(trait_type: &str, value: u64) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            value: AttributeValue::Number(value),
        }
    }
}

/// Metadata document uploaded in step 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<TokenAttribute>,
}

impl TokenMetadata {
    pub fn attribute(&self, trait_type: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| &a.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedToken {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub image_uri: String,
    pub metadata_uri: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}
