//! Provider-backed client on top of `genai`

use super::client::LLMClient;
use super::error::BackendError;
use super::types::{Completion, Prompt};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Sends prompts to one model of one provider
pub struct GenAIClient {
    client: Client,
    provider: AdapterKind,
    model: String,
    timeout: Duration,
}

impl GenAIClient {
    /// `endpoint` replaces the provider's default base URL
    pub fn new(
        provider: AdapterKind,
        model: String,
        timeout: Duration,
        endpoint: Option<String>,
    ) -> Result<Self, BackendError> {
        if model.trim().is_empty() {
            return Err(BackendError::Configuration(
                "model name must not be empty".to_string(),
            ));
        }

        let client = match endpoint {
            Some(url) => {
                debug!(provider = provider.as_str(), %url, "Using custom endpoint");
                pinned_client(provider, model.clone(), url)
            }
            None => Client::default(),
        };

        Ok(Self {
            client,
            provider,
            model,
            timeout,
        })
    }

    fn request_error(&self, message: impl ToString) -> BackendError {
        BackendError::Request {
            provider: self.provider.as_str().to_string(),
            message: message.to_string(),
        }
    }
}

/// Client whose every call goes to `url` with the provider's key from the environment
fn pinned_client(provider: AdapterKind, model: String, url: String) -> Client {
    let resolver = ServiceTargetResolver::from_resolver_fn(
        move |_: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let auth = provider
                .default_key_env_name()
                .map_or_else(|| AuthData::from_single(""), |var| AuthData::from_env(var));
            Ok(ServiceTarget {
                endpoint: Endpoint::from_owned(url.clone()),
                auth,
                model: ModelIden::new(provider, &model),
            })
        },
    );
    Client::builder()
        .with_service_target_resolver(resolver)
        .build()
}

#[async_trait]
impl LLMClient for GenAIClient {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, BackendError> {
        let started = Instant::now();
        let request = ChatRequest::new(vec![ChatMessage::user(prompt.task.clone())])
            .with_system(prompt.instructions.clone());
        let options = ChatOptions::default().with_temperature(f64::from(prompt.temperature));

        let call = self.client.exec_chat(&self.model, request, Some(&options));
        let response = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| {
                warn!(provider = self.provider.as_str(), "Request timed out");
                BackendError::Timeout {
                    seconds: self.timeout.as_secs(),
                }
            })?
            .map_err(|e| self.request_error(e))?;

        Ok(Completion {
            text: response.first_text().unwrap_or_default().to_string(),
            elapsed: started.elapsed(),
        })
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_provider_and_model() {
        let client = GenAIClient::new(
            AdapterKind::Ollama,
            "qwen3-coder:30b".to_string(),
            Duration::from_secs(30),
            Some("http://localhost:11434/".to_string()),
        )
        .unwrap();

        assert_eq!(client.name(), "Ollama");
        assert_eq!(client.model(), "qwen3-coder:30b");
    }

    #[test]
    fn test_empty_model_rejected() {
        let result = GenAIClient::new(
            AdapterKind::Ollama,
            "  ".to_string(),
            Duration::from_secs(30),
            None,
        );
        assert!(matches!(result, Err(BackendError::Configuration(_))));
    }
}
