//! LLM request/response types for PantryPlan
//!
//! One request carries one prompt and the JSON schema the reply must follow.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A structured generation request - everything needed for one call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full natural-language instruction text
    pub prompt: String,

    /// Output schema the service is asked to conform to
    pub schema: serde_json::Value,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, schema: serde_json::Value) -> Self {
        let prompt = prompt.into();
        debug!(prompt_len = prompt.len(), "GenerationRequest::new: called");
        Self { prompt, schema }
    }
}

/// Text returned by the service
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Raw response text (JSON when the schema was honoured)
    pub text: String,

    /// Why generation stopped, as reported by the service
    pub finish_reason: Option<String>,

    /// Token usage for this call
    pub usage: TokenUsage,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
