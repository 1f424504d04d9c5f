//! The token creation flow and the pieces it assembles.

pub mod create;
pub mod error;
pub mod image;
pub mod metadata;

pub use create::TokenCreator;
pub use error::{StepFailure, TokenCreationError};
