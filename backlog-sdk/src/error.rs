// ABOUTME: Custom error types for Backlog SDK with user-friendly messages
// ABOUTME: Separates transport, API, decode, resolution and validation failures

use thiserror::Error;

use crate::resolver::ResourceKind;

#[derive(Debug, Error)]
pub enum BacklogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: Request took too long to complete")]
    Timeout,

    #[error("Backlog API error: {message} (code: {code})")]
    Api {
        status: u16,
        message: String,
        code: i64,
    },

    #[error("Backlog API error: status code {0}")]
    Status(u16),

    #[error("Invalid API response format: {0}")]
    InvalidResponse(String),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl BacklogError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        BacklogError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            BacklogError::Network(_) => Some("Check your internet connection and the space URL"),
            BacklogError::Timeout => Some("Try again or check your network connection"),
            BacklogError::Api { status: 401, .. } | BacklogError::Status(401) => {
                Some("Your API key was rejected. Run `bl auth login` again")
            }
            BacklogError::Api { status: 429, .. } | BacklogError::Status(429) => {
                Some("Wait a moment before making another request")
            }
            BacklogError::NotFound { .. } => Some("Names are matched exactly, including case"),
            _ => None,
        }
    }

    /// Network-level failures, where no response from the API was decoded.
    pub fn is_transport(&self) -> bool {
        matches!(self, BacklogError::Network(_) | BacklogError::Timeout)
    }
}

impl From<reqwest::Error> for BacklogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BacklogError::Timeout
        } else {
            // The request URL carries the API key in its query string.
            BacklogError::Network(err.without_url().to_string())
        }
    }
}

impl From<serde_json::Error> for BacklogError {
    fn from(err: serde_json::Error) -> Self {
        BacklogError::InvalidResponse(err.to_string())
    }
}
