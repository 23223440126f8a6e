//! Gemini provider implementation.
//!
//! Implements text generation using Google's Gemini `generateContent` REST API.

use super::{Generation, Prompt, ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout on the HTTP client.
    pub timeout: Duration,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the configured model and method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.config.timeout)
        } else {
            ProviderError::NetworkError(err.to_string())
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Generation, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart {
                        text: &prompt.system_instruction,
                    },
                    RequestPart {
                        text: &prompt.user_instruction,
                    },
                ],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            system_len = prompt.system_instruction.len(),
            user_len = prompt.user_instruction.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url("generateContent"))
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        interpret_response(api_response)
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status: response.status().as_u16(),
                message: "Health check failed".to_string(),
            })
        }
    }
}

/// Turn a decoded response into a [`Generation`].
///
/// Text parts of the first candidate are concatenated in order.
fn interpret_response(response: GenerateContentResponse) -> Result<Generation, ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        tracing::warn!(block_reason = reason, "Gemini blocked the prompt");
        return Err(ProviderError::ContentFiltered);
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(Generation::Empty);
    };

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(ProviderError::ContentFiltered);
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        Ok(Generation::Empty)
    } else {
        Ok(Generation::Text(text))
    }
}

/// Pull `error.message` out of a Gemini error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
