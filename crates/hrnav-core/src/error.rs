//! Menu errors

use thiserror::Error;

use crate::domain::NodeId;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Menu node {path} exceeds the maximum depth of {max} levels")]
    DepthExceeded { path: String, max: usize },

    #[error("Duplicate menu id {id} under {parent}")]
    DuplicateId { parent: String, id: NodeId },

    #[error("Duplicate link {link} on {first} and {second}")]
    DuplicateLink { link: String, first: String, second: String },

    #[error("Invalid menu level: {0}")]
    InvalidLevel(u8),

    #[error("Menu document parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Menu source read error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Role provider error: {0}")]
    RoleProviderError(String),
}

impl From<validator::ValidationErrors> for MenuError {
    fn from(errors: validator::ValidationErrors) -> Self {
        MenuError::ValidationError(errors.to_string())
    }
}
