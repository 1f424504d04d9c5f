//! Validation and display helpers shared by the HTTP layer and the
//! creation flow.

pub mod formatting;
pub mod validation;

pub use formatting::{format_address, format_balance, format_native_fixed, truncate_string};
pub use validation::{validate_token_creation_params, ValidationError};
