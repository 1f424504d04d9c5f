use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::nadfun::ApiError;
use crate::rpc::RpcError;
use crate::token::TokenCreationError;
use crate::types::token::TokenCreationProgress;
use crate::util::validation::ValidationError;

/// Everything a handler can fail with, rendered as `{ error, message }`.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("{source}")]
    Creation {
        source: TokenCreationError,
        progress: Box<TokenCreationProgress>,
        /// The agent's in-character take on the failure.
        reply: Option<String>,
    },
}

impl ServerError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn creation(source: TokenCreationError, progress: TokenCreationProgress) -> Self {
        Self::Creation {
            source,
            progress: Box::new(progress),
            reply: None,
        }
    }

    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        if let ServerError::Creation { reply, .. } = &mut self {
            *reply = Some(text.into());
        }
        self
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::Api(_) | ServerError::Rpc(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Creation { source, .. } if source.source.is_client_error() => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Creation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short summary naming the failing layer.
    fn summary(&self) -> String {
        match self {
            ServerError::BadRequest(message) => message.clone(),
            ServerError::Validation(_) => "Invalid token parameters".to_string(),
            ServerError::Api(e) => format!("Nad.fun API Error: {}", e),
            ServerError::Rpc(e) => format!("Monad RPC Error: {}", e),
            ServerError::Creation { source, .. } => {
                format!("Token Creation Error: {}", source.message())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        let mut body = json!({
            "error": self.summary(),
            "message": self.to_string(),
        });

        match &self {
            ServerError::Validation(ValidationError::Multiple(errors)) => {
                body["errors"] = json!(errors);
            }
            ServerError::Api(e) => {
                if let Some(code) = &e.code {
                    body["code"] = json!(code);
                }
            }
            ServerError::Creation {
                source,
                progress,
                reply,
            } => {
                body["step"] = json!(source.step);
                body["progress"] = json!(progress);
                if let Some(reply) = reply {
                    body["reply"] = json!(reply);
                }
                if let Some(code) = source.source.code() {
                    body["code"] = json!(code);
                }
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}
