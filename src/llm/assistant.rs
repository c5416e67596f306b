//! The two text-generation calls the pipelines make

use super::client::LLMClient;
use super::error::BackendError;
use super::types::Prompt;
use crate::classify::ProjectDescription;
use crate::readme::release_notes_prompt;
use std::sync::Arc;
use tracing::{debug, info};

const README_SYSTEM_PROMPT: &str = "You are a technical writer who produces \
GitHub README files in Markdown. Answer with the README content only.";

const RELEASE_SYSTEM_PROMPT: &str = "You are a release manager. Answer with a \
single JSON object and nothing else.";

/// Drafts README and release text through an [`LLMClient`]
#[derive(Clone)]
pub struct Assistant {
    client: Arc<dyn LLMClient>,
}

impl Assistant {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn LLMClient> {
        &self.client
    }

    /// Generates README markdown from a fully built prompt
    pub async fn generate_readme(&self, prompt: &str) -> Result<String, BackendError> {
        info!(
            "Requesting README from {} ({})",
            self.client.name(),
            self.client.model()
        );
        self.complete(README_SYSTEM_PROMPT, prompt.to_string())
            .await
    }

    /// Asks for release data; the raw answer is parsed by the caller
    pub async fn generate_release_info(
        &self,
        desc: &ProjectDescription,
    ) -> Result<String, BackendError> {
        info!("Requesting release notes from {}", self.client.name());
        self.complete(RELEASE_SYSTEM_PROMPT, release_notes_prompt(desc))
            .await
    }

    async fn complete(&self, system: &str, prompt: String) -> Result<String, BackendError> {
        let completion = self.client.complete(&Prompt::new(system, prompt)).await?;
        debug!(
            "LLM answered in {:?} ({} chars)",
            completion.elapsed,
            completion.text.len()
        );

        let text = completion.text.trim();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("client", &self.client.name())
            .finish()
    }
}
