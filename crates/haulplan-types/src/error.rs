//! Error types for haulplan

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// One problem found on one cargo item during boundary validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemIssue {
    pub item_id: String,
    pub field: String,
    pub reason: String,
}

impl std::fmt::Display for ItemIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {}", self.item_id, self.field, self.reason)
    }
}

/// Input rejected at the planning boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Cargo list is empty")]
    EmptyCargo,

    #[error("Invalid cargo items: {}", join_issues(.0))]
    InvalidItems(Vec<ItemIssue>),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn join_issues(issues: &[ItemIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown state code: {0}")]
    UnknownState(String),

    #[error("Trailer not found: {0}")]
    TrailerNotFound(String),

    #[error("Trailer catalog error: {0}")]
    Catalog(String),

    #[error("Route error: {0}")]
    Route(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_items_message_lists_every_issue() {
        let err = ValidationError::InvalidItems(vec![
            ItemIssue {
                item_id: "a".to_string(),
                field: "length_ft".to_string(),
                reason: "must be greater than zero".to_string(),
            },
            ItemIssue {
                item_id: "b".to_string(),
                field: "quantity".to_string(),
                reason: "must be at least 1".to_string(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("a: length_ft must be greater than zero"));
        assert!(msg.contains("b: quantity must be at least 1"));
    }

    #[test]
    fn test_validation_converts_into_error() {
        let err: Error = ValidationError::EmptyCargo.into();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyCargo)));
    }
}
