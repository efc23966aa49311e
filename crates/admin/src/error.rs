//! Unified error handling for the dashboard.

use thiserror::Error;

use crate::ai::GenerateError;
use crate::claude::ClaudeError;
use crate::config::ConfigError;
use crate::db::StoreError;
use crate::services::DataError;

/// Application-level error type for the dashboard hosts.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Direct document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Business data operation failed.
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Claude API operation failed.
    #[error("Claude error: {0}")]
    Claude(#[from] ClaudeError),

    /// AI text generation failed.
    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    /// Bad input from the operator.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the failure came from an unreachable or failing backend rather
    /// than from the operator's input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        !matches!(
            self,
            Self::BadRequest(_) | Self::Config(_) | Self::Data(DataError::Validation(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("unknown product".to_string());
        assert_eq!(err.to_string(), "Bad request: unknown product");

        let err = AppError::from(StoreError::Unreachable("timed out".to_string()));
        assert_eq!(err.to_string(), "Store error: store unreachable: timed out");
    }

    #[test]
    fn test_server_error_classification() {
        let validation = AppError::from(DataError::Validation(ValidationError::new(
            "name",
            "must not be empty",
        )));
        assert!(!validation.is_server_error());

        let unreachable = AppError::from(StoreError::Unreachable("down".to_string()));
        assert!(unreachable.is_server_error());
    }
}
