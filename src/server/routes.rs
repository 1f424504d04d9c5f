use axum::extract::{Multipart, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{AppState, ServerError};
use crate::agent::wants_suggestions;
use crate::token::image::content_type_from_file_name;
use crate::token::metadata::generate_description;
use crate::token::TokenCreator;
use crate::types::token::{CreatedToken, ImagePayload, TokenCreationParams};
use crate::util::formatting::{format_address, truncate_string};
use crate::util::validation::{
    is_valid_address, normalize_symbol, validate_token_creation_params, ValidationError,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    /// Logged only; replies do not depend on it.
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ServerError::bad_request("Message is required"))?;

    tracing::debug!("Chat message: {}", truncate_string(&message, 80));
    if let Some(context) = &request.context {
        tracing::debug!("Chat context: {}", context);
    }

    let mut rng = StdRng::from_entropy();
    let response = state.agent.respond_to_user(&mut rng, &message);
    let suggestions = if wants_suggestions(&message) {
        Some(state.agent.suggest_token_names(&mut rng, None))
    } else {
        None
    };

    Ok(Json(ChatResponse {
        success: true,
        response,
        suggestions: suggestions.filter(|s| !s.is_empty()),
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub theme: Option<String>,
    /// Only read for `type=description`.
    pub name: Option<String>,
    pub symbol: Option<String>,
}

pub async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<Value>, ServerError> {
    let kind = query.kind.unwrap_or_else(|| "names".to_string());
    let mut rng = StdRng::from_entropy();
    let theme = query.theme.as_deref().filter(|t| !t.is_empty());

    let suggestions = match kind.as_str() {
        "themes" => state.agent.suggest_themes(),
        "description" => {
            let name = query
                .name
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| ServerError::bad_request("Token name is required"))?;
            let symbol = query
                .symbol
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(|| ServerError::bad_request("Token symbol is required"))?;
            vec![generate_description(
                &mut rng,
                name.trim(),
                &normalize_symbol(&symbol),
                theme,
            )]
        }
        _ => state.agent.suggest_token_names(&mut rng, theme),
    };

    Ok(Json(json!({
        "success": true,
        "type": kind,
        "suggestions": suggestions,
    })))
}

pub async fn mine_salt(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let mined = state.api.mine_salt().await?;

    Ok(Json(json!({
        "success": true,
        "salt": mined.salt,
        "address": mined.address,
    })))
}

#[derive(Debug, Deserialize)]
pub struct TokenStatusQuery {
    pub address: Option<String>,
}

pub async fn token_status(
    State(state): State<AppState>,
    Query(query): Query<TokenStatusQuery>,
) -> Result<Json<Value>, ServerError> {
    let address = query
        .address
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ServerError::bad_request("Token address is required"))?;
    if !is_valid_address(&address) {
        return Err(ValidationError::invalid("address", "Invalid token address").into());
    }

    let status = state.api.get_token_status(&address).await?;

    Ok(Json(json!({
        "success": true,
        "status": status,
    })))
}

pub async fn deploy_fee(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
    let fee = state.contract.get_deploy_fee().await?;
    let gas_price = state.contract.chain().get_gas_price().await?;

    Ok(Json(json!({
        "success": true,
        "deployFee": fee.deploy_fee.to_string(),
        "formattedFee": fee.formatted_fee,
        "gasPrice": gas_price.to_string(),
    })))
}

/// Fields of the `/create-token` multipart form.
#[derive(Debug, Default)]
struct CreateTokenForm {
    name: Option<String>,
    symbol: Option<String>,
    description: Option<String>,
    theme: Option<String>,
    image: Option<ImagePayload>,
}

impl CreateTokenForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ServerError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::bad_request(format!("Invalid form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or("image").to_string();
                    let content_type = field
                        .content_type()
                        .map(str::to_string)
                        .or_else(|| content_type_from_file_name(&file_name).map(str::to_string))
                        .unwrap_or_default();
                    let bytes = field.bytes().await.map_err(|e| {
                        ServerError::bad_request(format!("Failed to read image: {}", e))
                    })?;
                    form.image = Some(ImagePayload::new(bytes.to_vec(), file_name, content_type));
                }
                "name" | "symbol" | "description" | "theme" => {
                    let value = field.text().await.map_err(|e| {
                        ServerError::bad_request(format!("Failed to read {}: {}", name, e))
                    })?;
                    let value = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                    match name.as_str() {
                        "name" => form.name = value,
                        "symbol" => form.symbol = value,
                        "description" => form.description = value,
                        _ => form.theme = value,
                    }
                }
                other => tracing::debug!("Ignoring form field {}", other),
            }
        }

        Ok(form)
    }

    fn into_params(self) -> Result<TokenCreationParams, ValidationError> {
        let name = self.name.ok_or_else(|| ValidationError::missing("name"))?;
        let symbol = self.symbol.ok_or_else(|| ValidationError::missing("symbol"))?;
        let description = self
            .description
            .ok_or_else(|| ValidationError::missing("description"))?;
        let image = self.image.ok_or_else(|| ValidationError::missing("Image file"))?;

        validate_token_creation_params(&name, &symbol, &description, Some(&image))?;

        let params = TokenCreationParams::new(name, normalize_symbol(&symbol), description, Some(image));
        Ok(match self.theme {
            Some(theme) => params.with_theme(theme),
            None => params,
        })
    }
}

pub async fn create_token(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, ServerError> {
    let mut params = CreateTokenForm::read(multipart).await?.into_params()?;

    let mut creator = TokenCreator::new(state.api.clone(), state.contract.clone());
    let address = match creator.create_token(&mut params).await {
        Ok(address) => address,
        Err(e) => {
            let reply = state
                .agent
                .handle_error(&mut StdRng::from_entropy(), &e.message());
            return Err(ServerError::creation(e, creator.progress()).with_reply(reply));
        }
    };

    let token = CreatedToken {
        address,
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        image_uri: params.image_uri.clone().unwrap_or_default(),
        metadata_uri: params.metadata_uri.clone().unwrap_or_default(),
        created_at: Utc::now(),
        transaction_hash: creator.transaction_hash().map(|h| h.to_string()),
    };
    let message = state.agent.celebrate_success(
        &mut StdRng::from_entropy(),
        &format_address(&address.to_string(), 4),
        &params.name,
    );

    Ok(Json(json!({
        "success": true,
        "token": token,
        "progress": creator.progress(),
        "message": message,
    })))
}
