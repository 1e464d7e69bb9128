//! LLM Client module for PantryPlan
//!
//! Provides the structured generation request used to produce meal plans.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::{GeminiClient, MODEL};
pub use types::{GenerationRequest, GenerationResponse, TokenUsage};

use crate::config::LlmConfig;

/// Create the LLM client described by config
///
/// Fails with `LlmError::MissingCredential` when the API key is not set.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(api_key_env = %config.api_key_env, base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(GeminiClient::from_config(config)?))
}
