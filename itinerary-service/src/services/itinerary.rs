//! Itinerary generation: validate the trip, build the prompt, call the
//! provider once (plus any configured retries), normalize the text.

use crate::models::{ItineraryResult, TripRequest};
use crate::services::metrics;
use crate::services::prompt::build_prompt;
use crate::services::providers::{Generation, Prompt, ProviderError, TextProvider};
use service_core::error::AppError;
use service_core::retry::{retry_with_backoff, RetryConfig};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("Provider returned no itinerary text")]
    NoContent,
}

impl ItineraryError {
    /// Outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ItineraryError::Validation(_) => "validation_error",
            ItineraryError::Provider(_) => "provider_error",
            ItineraryError::NoContent => "no_content",
        }
    }
}

impl From<ItineraryError> for AppError {
    fn from(err: ItineraryError) -> Self {
        match err {
            ItineraryError::Validation(errors) => AppError::ValidationError(errors),
            other => AppError::GenerationFailed(format!("Failed to generate itinerary: {}", other)),
        }
    }
}

/// Behavior knobs that differed between deployments.
#[derive(Debug, Clone)]
pub struct ItineraryOptions {
    /// Echo the caller's `tripId` in the result.
    pub echo_trip_id: bool,
    /// Trim surrounding whitespace from the provider text.
    pub trim_output: bool,
    /// Budget for a single provider attempt.
    pub provider_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for ItineraryOptions {
    fn default() -> Self {
        Self {
            echo_trip_id: true,
            trim_output: true,
            provider_timeout: Duration::from_secs(60),
            retry: RetryConfig::no_retry(),
        }
    }
}

pub struct ItineraryGenerator {
    provider: Arc<dyn TextProvider>,
    options: ItineraryOptions,
}

impl ItineraryGenerator {
    pub fn new(provider: Arc<dyn TextProvider>, options: ItineraryOptions) -> Self {
        Self { provider, options }
    }

    #[tracing::instrument(
        skip_all,
        fields(
            trip_id = request.trip_id.as_deref().unwrap_or("-"),
            provider = self.provider.name(),
            model = self.provider.model(),
        )
    )]
    pub async fn generate(&self, request: &TripRequest) -> Result<ItineraryResult, ItineraryError> {
        request.validate()?;

        let prompt = build_prompt(request);
        let prompt = &prompt;

        let start = Instant::now();
        let outcome = retry_with_backoff(&self.options.retry, "generate_itinerary", move || {
            self.attempt(prompt)
        })
        .await;
        metrics::record_provider_latency(
            self.provider.name(),
            self.provider.model(),
            start.elapsed().as_secs_f64(),
        );

        let generation = outcome.map_err(|e| {
            metrics::record_provider_error(self.provider.name(), e.kind());
            tracing::warn!(error = %e, "Text provider call failed");
            e
        })?;

        let text = match generation {
            Generation::Text(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::warn!("Text provider returned no content");
                return Err(ItineraryError::NoContent);
            }
        };

        let itinerary = if self.options.trim_output {
            text.trim().to_string()
        } else {
            text
        };

        tracing::info!(
            itinerary_len = itinerary.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Itinerary generated"
        );

        Ok(ItineraryResult {
            trip_id: if self.options.echo_trip_id {
                request.trip_id.clone()
            } else {
                None
            },
            itinerary,
        })
    }

    /// One provider call bounded by the configured timeout.
    async fn attempt(&self, prompt: &Prompt) -> Result<Generation, ProviderError> {
        let timeout = self.options.provider_timeout;
        match tokio::time::timeout(timeout, self.provider.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupSize;
    use crate::services::providers::mock::MockTextProvider;

    fn paris() -> TripRequest {
        TripRequest {
            trip_id: Some("t1".to_string()),
            location: "Paris".to_string(),
            date_from: "2024-05-01".to_string(),
            date_to: "2024-05-03".to_string(),
            interests: vec!["art".to_string(), "food".to_string()],
            group_size: GroupSize::default(),
        }
    }

    fn generator(provider: &Arc<MockTextProvider>, options: ItineraryOptions) -> ItineraryGenerator {
        ItineraryGenerator::new(provider.clone(), options)
    }

    fn fast_retry(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            add_jitter: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn generates_trimmed_itinerary_with_echoed_trip_id() {
        let provider = Arc::new(MockTextProvider::new().with_text("\n  Day 1: Louvre  \n"));
        let result = generator(&provider, ItineraryOptions::default())
            .generate(&paris())
            .await
            .unwrap();

        assert_eq!(
            result,
            ItineraryResult {
                trip_id: Some("t1".to_string()),
                itinerary: "Day 1: Louvre".to_string(),
            }
        );

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        let user = &prompts[0].user_instruction;
        for expected in ["Paris", "2024-05-01", "2024-05-03", "2–8 people", "art, food"] {
            assert!(user.contains(expected), "missing {expected:?} in {user:?}");
        }
    }

    #[tokio::test]
    async fn validation_failure_makes_no_provider_call() {
        let provider = Arc::new(MockTextProvider::new());
        let request = TripRequest {
            location: String::new(),
            ..paris()
        };

        let err = generator(&provider, ItineraryOptions::default())
            .generate(&request)
            .await
            .unwrap_err();

        assert!(matches!(err, ItineraryError::Validation(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_generation_is_no_content() {
        let provider = Arc::new(MockTextProvider::new().with_reply(Ok(Generation::Empty)));
        let err = generator(&provider, ItineraryOptions::default())
            .generate(&paris())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraryError::NoContent));
    }

    #[tokio::test]
    async fn whitespace_only_text_is_no_content() {
        let provider = Arc::new(MockTextProvider::new().with_text(" \n\t "));
        let err = generator(&provider, ItineraryOptions::default())
            .generate(&paris())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraryError::NoContent));
    }

    #[tokio::test]
    async fn provider_error_is_wrapped_with_its_message() {
        let provider = Arc::new(MockTextProvider::new().with_reply(Err(ProviderError::ApiError {
            status: 403,
            message: "quota exceeded".to_string(),
        })));
        let err = generator(&provider, ItineraryOptions::default())
            .generate(&paris())
            .await
            .unwrap_err();

        assert!(matches!(err, ItineraryError::Provider(ProviderError::ApiError { .. })));
        assert!(err.to_string().contains("quota exceeded"));

        match AppError::from(err) {
            AppError::GenerationFailed(msg) => {
                assert_eq!(msg, "Failed to generate itinerary: API error 403: quota exceeded")
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[tokio::test]
    async fn identical_requests_are_not_cached() {
        let provider = Arc::new(MockTextProvider::new());
        let generator = generator(&provider, ItineraryOptions::default());

        generator.generate(&paris()).await.unwrap();
        generator.generate(&paris()).await.unwrap();

        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn options_disable_echo_and_trim() {
        let provider = Arc::new(MockTextProvider::new().with_text("  Day 1\n"));
        let options = ItineraryOptions {
            echo_trip_id: false,
            trim_output: false,
            ..Default::default()
        };

        let result = generator(&provider, options).generate(&paris()).await.unwrap();
        assert_eq!(result.trip_id, None);
        assert_eq!(result.itinerary, "  Day 1\n");
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = Arc::new(MockTextProvider::new().with_delay(Duration::from_secs(5)));
        let options = ItineraryOptions {
            provider_timeout: Duration::from_millis(50),
            ..Default::default()
        };

        let err = generator(&provider, options).generate(&paris()).await.unwrap_err();
        assert!(matches!(err, ItineraryError::Provider(ProviderError::Timeout(_))));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_when_enabled() {
        let provider = Arc::new(
            MockTextProvider::new()
                .with_reply(Err(ProviderError::RateLimited))
                .with_text("Day 1"),
        );
        let options = ItineraryOptions {
            retry: fast_retry(2),
            ..Default::default()
        };

        let result = generator(&provider, options).generate(&paris()).await.unwrap();
        assert_eq!(result.itinerary, "Day 1");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_never_retried() {
        let provider = Arc::new(MockTextProvider::new().with_reply(Err(ProviderError::ContentFiltered)));
        let options = ItineraryOptions {
            retry: fast_retry(3),
            ..Default::default()
        };

        let err = generator(&provider, options).generate(&paris()).await.unwrap_err();
        assert!(matches!(err, ItineraryError::Provider(ProviderError::ContentFiltered)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn transient_failure_without_retry_is_single_call() {
        let provider = Arc::new(MockTextProvider::new().with_reply(Err(ProviderError::RateLimited)));
        let err = generator(&provider, ItineraryOptions::default())
            .generate(&paris())
            .await
            .unwrap_err();
        assert!(matches!(err, ItineraryError::Provider(ProviderError::RateLimited)));
        assert_eq!(provider.call_count(), 1);
    }
}
