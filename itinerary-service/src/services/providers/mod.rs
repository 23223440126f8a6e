//! Generative text provider abstractions and implementations.
//!
//! The itinerary generator only talks to [`TextProvider`], so the Gemini
//! backend can be swapped for the mock in tests and local development.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use service_core::retry::Retryable;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Content filtered by provider")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError { .. } => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::Timeout(_) => "timeout",
            ProviderError::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl Retryable for ProviderError {
    fn is_transient(&self) -> bool {
        match self {
            ProviderError::RateLimited
            | ProviderError::NetworkError(_)
            | ProviderError::Timeout(_) => true,
            ProviderError::ApiError { status, .. } => *status >= 500,
            ProviderError::NotConfigured(_)
            | ProviderError::ContentFiltered
            | ProviderError::InvalidResponse(_) => false,
        }
    }
}

/// The ordered inputs handed to a provider: the fixed system instruction
/// first, then the per-request user instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_instruction: String,
}

/// Outcome of a successful provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// The provider produced text.
    Text(String),
    /// The call succeeded but carried no text.
    Empty,
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name used in logs and metrics.
    fn name(&self) -> &str;

    /// Model identifier the provider targets.
    fn model(&self) -> &str;

    /// Generate text for the prompt. Exactly one upstream request per call.
    async fn generate(&self, prompt: &Prompt) -> Result<Generation, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
