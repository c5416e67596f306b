use super::error::BackendError;
use super::types::{Completion, Prompt};
use async_trait::async_trait;

/// A text generator the assistant can hand a prompt to
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, BackendError>;

    /// Provider name, for logs
    fn name(&self) -> &str;

    fn model(&self) -> &str;
}
