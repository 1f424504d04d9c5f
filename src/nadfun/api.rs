use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::types::nadfun::{
    ApiErrorBody, ImageUploadResponse, MetadataUploadResponse, SaltResponse, TokenStatus,
};
use crate::types::token::{ImagePayload, TokenMetadata};

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// HTTP status, absent when the request never got a response.
    pub status: Option<u16>,
    /// Service-specific error code from the response body.
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// The launch platform's upload and salt-mining service.
#[async_trait]
pub trait LaunchpadApi: Send + Sync {
    /// Upload the token image, returning its hosted URI.
    async fn upload_image(&self, image: &ImagePayload) -> Result<String, ApiError>;

    /// Upload the metadata document, returning its hosted URI.
    async fn upload_metadata(&self, metadata: &TokenMetadata) -> Result<String, ApiError>;

    /// Mine a salt whose deployment address satisfies the vanity suffix.
    async fn mine_salt(&self) -> Result<SaltResponse, ApiError>;

    async fn get_token_status(&self, address: &str) -> Result<TokenStatus, ApiError>;
}

pub struct NadFunClient {
    base_url: Url,
    client: reqwest::Client,
}

impl NadFunClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::new(format!("Invalid API URL {}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            let err = ApiError::new(format!("{}: {}", fallback, e));
            match e.status() {
                Some(status) => err.with_status(status.as_u16()),
                None => err,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            let code = body.code_string();
            let mut err = ApiError::new(body.message.unwrap_or_else(|| fallback.to_string()))
                .with_status(status.as_u16());
            err.code = code;
            tracing::warn!(
                "Launchpad API returned {}: {} (code {:?})",
                status,
                err.message,
                err.code
            );
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            ApiError::new(format!("{}: malformed response: {}", fallback, e))
                .with_status(status.as_u16())
        })
    }
}

#[async_trait]
impl LaunchpadApi for NadFunClient {
    async fn upload_image(&self, image: &ImagePayload) -> Result<String, ApiError> {
        const FALLBACK: &str = "Failed to upload image";

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| ApiError::new(format!("{}: {}", FALLBACK, e)))?;
        let form = Form::new().part("image", part);

        tracing::debug!(
            "Uploading image {} ({} bytes)",
            image.file_name,
            image.len()
        );
        let request = self
            .client
            .post(self.endpoint("/agent/token/image"))
            .multipart(form);
        let response: ImageUploadResponse = Self::send(request, FALLBACK).await?;
        Ok(response.image_uri)
    }

    async fn upload_metadata(&self, metadata: &TokenMetadata) -> Result<String, ApiError> {
        let request = self
            .client
            .post(self.endpoint("/agent/token/metadata"))
            .json(metadata);
        let response: MetadataUploadResponse =
            Self::send(request, "Failed to upload metadata").await?;
        Ok(response.metadata_uri)
    }

    async fn mine_salt(&self) -> Result<SaltResponse, ApiError> {
        let request = self.client.post(self.endpoint("/agent/salt"));
        Self::send(request, "Failed to mine salt").await
    }

    async fn get_token_status(&self, address: &str) -> Result<TokenStatus, ApiError> {
        let request = self
            .client
            .get(self.endpoint(&format!("/agent/token/{}", address)));
        Self::send(request, "Failed to get token status").await
    }
}

impl std::fmt::Debug for NadFunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NadFunClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Multipart, Path};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::types::nadfun::TokenState;
    use crate::types::token::TokenAttribute;

    async fn spawn_fake_api() -> String {
        let router = Router::new()
            .route(
                "/agent/token/image",
                post(|mut multipart: Multipart| async move {
                    let field = multipart.next_field().await.unwrap().unwrap();
                    assert_eq!(field.name(), Some("image"));
                    assert_eq!(field.content_type(), Some("image/png"));
                    let bytes = field.bytes().await.unwrap();
                    Json(json!({ "image_uri": format!("ipfs://image-{}", bytes.len()) }))
                }),
            )
            .route(
                "/agent/token/metadata",
                post(|Json(body): Json<Value>| async move {
                    if body["symbol"] == "FAIL" {
                        return (
                            StatusCode::UNPROCESSABLE_ENTITY,
                            Json(json!({ "message": "symbol rejected", "code": 4221 })),
                        );
                    }
                    (
                        StatusCode::OK,
                        Json(json!({ "metadata_uri": format!("ipfs://meta-{}", body["symbol"].as_str().unwrap()) })),
                    )
                }),
            )
            .route(
                "/agent/salt",
                post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
            )
            .route(
                "/agent/token/:address",
                get(|Path(address): Path<String>| async move {
                    Json(json!({
                        "address": address,
                        "name": "CosmicChaos",
                        "symbol": "COSMIC",
                        "image_uri": "ipfs://image",
                        "metadata_uri": "ipfs://meta",
                        "created_at": "2024-01-01T00:00:00Z",
                        "status": "active"
                    }))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn metadata(symbol: &str) -> TokenMetadata {
        TokenMetadata {
            name: "CosmicChaos".to_string(),
            symbol: symbol.to_string(),
            description: "A token".to_string(),
            image: "ipfs://image".to_string(),
            attributes: vec![TokenAttribute::text("Vibe", "Zen")],
        }
    }

    #[tokio::test]
    async fn test_upload_image_sends_multipart() {
        let base = spawn_fake_api().await;
        let client = NadFunClient::new(&base, Duration::from_secs(5)).unwrap();
        let image = ImagePayload::new(vec![1, 2, 3, 4], "logo.png", "image/png");

        let uri = client.upload_image(&image).await.unwrap();
        assert_eq!(uri, "ipfs://image-4");
    }

    #[tokio::test]
    async fn test_upload_metadata_success_and_error_body() {
        let base = spawn_fake_api().await;
        let client = NadFunClient::new(&format!("{}/", base), Duration::from_secs(5)).unwrap();

        let uri = client.upload_metadata(&metadata("COSMIC")).await.unwrap();
        assert_eq!(uri, "ipfs://meta-COSMIC");

        let err = client.upload_metadata(&metadata("FAIL")).await.unwrap_err();
        assert_eq!(err.message, "symbol rejected");
        assert_eq!(err.status, Some(422));
        assert_eq!(err.code.as_deref(), Some("4221"));
    }

    #[tokio::test]
    async fn test_non_json_error_uses_fallback_message() {
        let base = spawn_fake_api().await;
        let client = NadFunClient::new(&base, Duration::from_secs(5)).unwrap();

        let err = client.mine_salt().await.unwrap_err();
        assert_eq!(err.message, "Failed to mine salt");
        assert_eq!(err.status, Some(503));
        assert_eq!(err.code, None);
    }

    #[tokio::test]
    async fn test_get_token_status() {
        let base = spawn_fake_api().await;
        let client = NadFunClient::new(&base, Duration::from_secs(5)).unwrap();

        let status = client
            .get_token_status("0x0000000000000000000000000000000000007777")
            .await
            .unwrap();
        assert_eq!(status.address, "0x0000000000000000000000000000000000007777");
        assert_eq!(status.status, TokenState::Active);
    }

    #[tokio::test]
    async fn test_connection_failure_has_no_status() {
        let client = NadFunClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.mine_salt().await.unwrap_err();
        assert!(err.message.starts_with("Failed to mine salt"));
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(NadFunClient::new("::nope::", Duration::from_secs(1)).is_err());
    }
}
