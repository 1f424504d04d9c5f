use thiserror::Error;

use crate::token::image::validate_image;
use crate::types::token::ImagePayload;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_SYMBOL_CHARS: usize = 10;
pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Bad user input, detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("{}", .0.join("; "))]
    Multiple(Vec<String>),
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub fn is_valid_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_valid_token_name(name: &str) -> bool {
    (1..=MAX_NAME_CHARS).contains(&name.chars().count())
}

/// Symbols are compared upper-cased: `cosmic` is valid and becomes `COSMIC`.
pub fn is_valid_token_symbol(symbol: &str) -> bool {
    let upper = normalize_symbol(symbol);
    (1..=MAX_SYMBOL_CHARS).contains(&upper.len())
        && upper.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

pub fn is_valid_description(description: &str) -> bool {
    (MIN_DESCRIPTION_CHARS..=MAX_DESCRIPTION_CHARS).contains(&description.chars().count())
}

pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Check every user-supplied creation field, reporting all problems at once.
pub fn validate_token_creation_params(
    name: &str,
    symbol: &str,
    description: &str,
    image: Option<&ImagePayload>,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if !is_valid_token_name(name) {
        errors.push(format!(
            "Token name must be between 1 and {} characters",
            MAX_NAME_CHARS
        ));
    }

    if !is_valid_token_symbol(symbol) {
        errors.push(format!(
            "Token symbol must be 1-{} uppercase alphanumeric characters",
            MAX_SYMBOL_CHARS
        ));
    }

    if !is_valid_description(description) {
        errors.push(format!(
            "Description must be between {} and {} characters",
            MIN_DESCRIPTION_CHARS, MAX_DESCRIPTION_CHARS
        ));
    }

    if let Some(image) = image {
        if let Err(e) = validate_image(image) {
            errors.push(e.to_string());
        }
    }

    match errors.len() {
        0 => Ok(()),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
