//! Mock provider for tests and local development.

use super::{Generation, Prompt, ProviderError, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Mock text provider.
///
/// Replies queued with [`MockTextProvider::with_reply`] are served in order;
/// once the queue is empty it answers with a canned itinerary built from the
/// user instruction. Every prompt it receives is recorded.
pub struct MockTextProvider {
    replies: Mutex<VecDeque<Result<Generation, ProviderError>>>,
    prompts: Mutex<Vec<Prompt>>,
    delay: Option<Duration>,
    healthy: bool,
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            delay: None,
            healthy: true,
        }
    }

    /// Queue a reply for the next unanswered call.
    pub fn with_reply(self, reply: Result<Generation, ProviderError>) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }

    /// Queue a text reply.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_reply(Ok(Generation::Text(text.into())))
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make the health check fail.
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<Prompt> {
        lock(&self.prompts).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<Generation, ProviderError> {
        lock(&self.prompts).push(prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.replies).pop_front();
        scripted.unwrap_or_else(|| {
            Ok(Generation::Text(format!(
                "Mock itinerary for: {}",
                prompt.user_instruction
            )))
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.healthy {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock provider marked unhealthy".to_string(),
            ))
        }
    }
}
