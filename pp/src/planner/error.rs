//! Planner error types
//!
//! Users see exactly two messages. The variants below exist for the logs.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Shown when a required field is missing at submit time
pub const VALIDATION_ERROR_MESSAGE: &str = "Please fill in all the required fields.";

/// Shown for every failure after a submission has started
pub const GENERATION_ERROR_MESSAGE: &str = "Sorry, we couldn't generate a meal plan. Please try again.";

/// Why a submission could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{}", VALIDATION_ERROR_MESSAGE)]
    Incomplete,

    #[error("a meal plan request is already in flight")]
    InFlight,
}

/// Why a started submission failed
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to read pantry file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API key not available: set the {env} environment variable")]
    MissingCredential { env: String },

    #[error("failed to render prompt: {0}")]
    Prompt(#[from] handlebars::RenderError),

    #[error("generation request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("response is not a valid meal plan: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("generation task ended without a result: {0}")]
    Task(String),
}

impl GenerationError {
    /// The message surfaced to the user, whatever the cause
    pub fn user_message(&self) -> &'static str {
        GENERATION_ERROR_MESSAGE
    }

    /// Short tag for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "file-read",
            Self::MissingCredential { .. } => "credential",
            Self::Prompt(_) => "prompt",
            Self::Llm(_) => "llm",
            Self::Parse(_) => "parse",
            Self::Task(_) => "task",
        }
    }

    /// HTTP status when the service rejected the request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Llm(e) => e.status(),
            _ => None,
        }
    }
}
