//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerationRequest, GenerationResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// A meal plan is one round trip: no conversation state, no streaming,
/// no retries.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single structured generation request
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
