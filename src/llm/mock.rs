use super::client::LLMClient;
use super::error::BackendError;
use super::types::{Completion, Prompt};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Answers prompts from a script and remembers what it was asked
///
/// Once the script runs out every call fails with [`BackendError::Exhausted`].
#[derive(Default)]
pub struct MockLLMClient {
    script: Mutex<VecDeque<Result<String, BackendError>>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl MockLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, text: impl Into<String>) {
        self.push(Ok(text.into()));
    }

    pub fn fail(&self, error: BackendError) {
        self.push(Err(error));
    }

    fn push(&self, answer: Result<String, BackendError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Task text of the most recent prompt
    pub fn last_task(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .map(|prompt| prompt.task.clone())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, BackendError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.clone());

        let answer = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Err(BackendError::Exhausted))?;

        Ok(Completion {
            text: answer,
            elapsed: Duration::ZERO,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_answers_in_order_then_exhausts() {
        let client = MockLLMClient::new();
        client.reply("first");
        client.fail(BackendError::EmptyResponse);

        let prompt = Prompt::new("rules", "task");
        assert_eq!(client.complete(&prompt).await.unwrap().text, "first");
        assert_eq!(
            client.complete(&prompt).await.unwrap_err(),
            BackendError::EmptyResponse
        );
        assert_eq!(
            client.complete(&prompt).await.unwrap_err(),
            BackendError::Exhausted
        );
        assert_eq!(client.prompts().len(), 3);
        assert_eq!(client.last_task().as_deref(), Some("task"));
    }
}
