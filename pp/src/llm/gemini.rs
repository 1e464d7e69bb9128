//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint with a
//! declared response schema and JSON response mime type.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{GenerationRequest, GenerationResponse, LlmClient, LlmError, TokenUsage};
use crate::config::LlmConfig;

/// Fixed model identifier
pub const MODEL: &str = "gemini-2.5-flash";

/// Mime type requesting JSON output that follows the schema
const RESPONSE_MIME_TYPE: &str = "application/json";

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config. This
    /// is the only place the credential is read.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "from_config: called");
        let api_key = config.get_api_key()?;
        let http = Client::builder().build().map_err(LlmError::Network)?;

        Ok(Self::new(api_key, config.base_url.clone(), http))
    }

    fn new(api_key: String, base_url: String, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, MODEL)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(prompt_len = request.prompt.len(), "build_request_body: called");
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "responseMimeType": RESPONSE_MIME_TYPE,
                "responseSchema": request.schema,
            },
        })
    }

    /// Parse the Gemini API response
    ///
    /// Concatenates the text parts of the first candidate.
    fn parse_response(api_response: GeminiResponse) -> Result<GenerationResponse, LlmError> {
        debug!(candidates = api_response.candidates.len(), "parse_response: called");
        let candidate = api_response.candidates.into_iter().next().ok_or_else(|| {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            LlmError::InvalidResponse(reason)
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            debug!(finish_reason = ?candidate.finish_reason, "parse_response: empty text");
            return Err(LlmError::InvalidResponse(format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(GenerationResponse {
            text,
            finish_reason: candidate.finish_reason,
            usage,
        })
    }

    /// Pull a readable message out of an error body
    fn error_message(body: &str) -> String {
        serde_json::from_str::<GeminiErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        debug!(model = MODEL, "generate: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            debug!(%status, "generate: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status,
                message: Self::error_message(&text),
            });
        }

        let api_response: GeminiResponse = response.json().await?;
        let result = Self::parse_response(api_response)?;
        info!(
            "Gemini response: finish_reason={:?}, tokens={}in/{}out ({} total)",
            result.finish_reason,
            result.usage.input_tokens,
            result.usage.output_tokens,
            result.usage.total()
        );
        Ok(result)
    }

    fn model(&self) -> &str {
        MODEL
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<GeminiPromptFeedback>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient::new(
            "test-key".to_string(),
            "https://generativelanguage.googleapis.com/".to_string(),
            Client::new(),
        )
    }

    #[test]
    fn test_endpoint_uses_fixed_model() {
        let client = test_client();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.model(), MODEL);
    }

    #[test]
    fn test_build_request_body() {
        let client = test_client();
        let schema = serde_json::json!({ "type": "OBJECT" });
        let body = client.build_request_body(&GenerationRequest::new("Plan my dinner", schema.clone()));

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Plan my dinner");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn test_parse_response_concatenates_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"meals\":"}, {"text": "[]}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 7, "totalTokenCount": 49}
        }"#;
        let api_response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let response = GeminiClient::parse_response(api_response).unwrap();

        assert_eq!(response.text, r#"{"meals":[]}"#);
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(response.usage.input_tokens, 42);
        assert_eq!(response.usage.output_tokens, 7);
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let api_response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let err = GeminiClient::parse_response(api_response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_response_empty_candidate() {
        let raw = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let api_response: GeminiResponse = serde_json::from_str(raw).unwrap();
        let err = GeminiClient::parse_response(api_response).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(GeminiClient::error_message(body), "API key not valid.");
        assert_eq!(GeminiClient::error_message("Bad Gateway"), "Bad Gateway");
    }
}
