//! Application-level errors for the `jira-fetch` binary.
//!
//! Library callers deal with [`ApiError`] and [`ConfigError`] directly; this
//! type aggregates them and turns them into messages fit for a terminal.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (writing output, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::ParseError(e) => format!("Configuration file is invalid: {}", e),
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ProfileNotFound(name) => format!("Profile '{}' not found.", name),
            },
            AppError::Api(e) => match e {
                ApiError::Http { status, body, .. } => match *status {
                    401 => "Authentication failed. Please check your email and API token."
                        .to_string(),
                    403 => "Access denied. You don't have permission to access this resource."
                        .to_string(),
                    404 => "The requested resource was not found.".to_string(),
                    429 => "Too many requests. Please wait a moment and try again.".to_string(),
                    500..=599 => format!("JIRA server error (HTTP {}). Please try again later.", status),
                    _ => format!("JIRA rejected the request (HTTP {}): {}", status, body),
                },
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::InvalidResponse(msg) => format!("Unexpected response from JIRA: {}", msg),
                ApiError::InvalidArgument(msg) => msg.clone(),
                ApiError::InvalidParams(e) => format!("Query parameters are not valid JSON: {}", e),
                ApiError::Keyring(_) => {
                    "Could not read the API token from secure storage.".to_string()
                }
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Api(e) if e.is_unauthorized() => Some(
                "Check your API token at https://id.atlassian.com/manage-profile/security/api-tokens",
            ),
            AppError::Api(e) if e.is_rate_limited() => Some("Wait a few seconds and try again."),
            AppError::Api(ApiError::Network(_)) => Some("Check your internet connection and JIRA URL."),
            AppError::Api(ApiError::Keyring(_)) => {
                Some("Run 'jira-fetch token set <profile> <token>' or pass --token.")
            }
            AppError::Config(ConfigError::ProfileNotFound(_)) => {
                Some("Add the profile to your config.toml or pass --url and --email.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
