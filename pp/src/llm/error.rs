//! LLM error types

use thiserror::Error;

/// Errors that can occur while talking to the generation service
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not found: set the {env} environment variable")]
    MissingCredential { env: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let err = LlmError::ApiError {
            status: 403,
            message: "API key not valid".to_string(),
        };
        assert_eq!(err.status(), Some(403));

        assert_eq!(LlmError::InvalidResponse("no candidates".to_string()).status(), None);
    }

    #[test]
    fn test_display_names_env_var() {
        let err = LlmError::MissingCredential {
            env: "MY_KEY".to_string(),
        };
        assert!(err.to_string().contains("MY_KEY"));
    }
}
