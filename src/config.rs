//! Configuration management for ghpublish
//!
//! Settings load from environment variables with defaults; command-line flags
//! override them afterwards.
//!
//! # Environment Variables
//!
//! - `GHPUBLISH_PROVIDER`: ollama|openai|anthropic|gemini|xai|groq - default: "ollama"
//! - `GHPUBLISH_MODEL`: model name - default: "qwen3-coder:30b"
//! - `GHPUBLISH_API_BASE_URL`: custom endpoint for the provider - optional
//! - `GHPUBLISH_REQUEST_TIMEOUT`: timeout in seconds - default: "120"
//! - `GHPUBLISH_BRANCH`: branch created and pushed - default: "main"
//! - `GHPUBLISH_ASSIST`: use the assistant for README and release text - default: "true"
//! - `GHPUBLISH_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials are read by genai itself (`OPENAI_API_KEY`,
//! `ANTHROPIC_API_KEY`, `GEMINI_API_KEY`, `XAI_API_KEY`, `GROQ_API_KEY`).

use crate::llm::{Assistant, BackendError, GenAIClient};
use genai::adapter::AdapterKind;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

const DEFAULT_MODEL: &str = "qwen3-coder:30b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid provider: {0}. Valid options: ollama, openai, anthropic, gemini, xai, groq")]
    InvalidProvider(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Backend initialization failed: {0}")]
    BackendInitError(#[from] BackendError),
}

/// Maps a provider name to the genai adapter
pub fn parse_provider(name: &str) -> Result<AdapterKind, ConfigError> {
    match name.trim().to_lowercase().as_str() {
        "ollama" => Ok(AdapterKind::Ollama),
        "openai" => Ok(AdapterKind::OpenAI),
        "anthropic" | "claude" => Ok(AdapterKind::Anthropic),
        "gemini" => Ok(AdapterKind::Gemini),
        "xai" | "grok" => Ok(AdapterKind::Xai),
        "groq" => Ok(AdapterKind::Groq),
        _ => Err(ConfigError::InvalidProvider(name.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct PublisherConfig {
    pub provider: AdapterKind,

    /// Model name, without provider prefix
    pub model: String,

    pub api_base_url: Option<String>,

    pub request_timeout_secs: u64,

    /// Branch initialised, pushed and released from
    pub branch: String,

    /// Draft README and release notes with the assistant
    pub assist: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PublisherConfig {
    /// Loads from `GHPUBLISH_*` environment variables, falling back to defaults
    fn default() -> Self {
        let provider = match env::var("GHPUBLISH_PROVIDER") {
            Ok(name) => parse_provider(&name).unwrap_or_else(|e| {
                warn!("{}; falling back to ollama", e);
                AdapterKind::Ollama
            }),
            Err(_) => AdapterKind::Ollama,
        };

        let model = env::var("GHPUBLISH_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base_url = env::var("GHPUBLISH_API_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let request_timeout_secs = env::var("GHPUBLISH_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let branch = env::var("GHPUBLISH_BRANCH").unwrap_or_else(|_| DEFAULT_BRANCH.to_string());

        let assist = env::var("GHPUBLISH_ASSIST")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(true);

        let log_level = env::var("GHPUBLISH_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            provider,
            model,
            api_base_url,
            request_timeout_secs,
            branch,
            assist,
            log_level,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl PublisherConfig {
    /// Checks ranges and names
    ///
    /// Provider credentials are checked by genai on the first request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Model name must not be empty".to_string(),
            ));
        }

        let branch = self.branch.trim();
        if branch.is_empty() || branch.chars().any(char::is_whitespace) || branch.starts_with('-') {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid branch name: '{}'",
                self.branch
            )));
        }

        if crate::util::parse_level(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the genai-backed assistant for the configured provider
    pub fn create_assistant(&self) -> Result<Assistant, ConfigError> {
        let client = GenAIClient::new(
            self.provider,
            self.model.clone(),
            self.request_timeout(),
            self.api_base_url.clone(),
        )?;
        Ok(Assistant::new(Arc::new(client)))
    }
}

impl fmt::Display for PublisherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ghpublish configuration:")?;
        writeln!(f, "  Provider: {}", self.provider.as_str())?;
        writeln!(f, "  Model: {}", self.model)?;
        if let Some(url) = &self.api_base_url {
            writeln!(f, "  API base URL: {}", url)?;
        }
        writeln!(f, "  Request timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  Branch: {}", self.branch)?;
        writeln!(f, "  Assistant: {}", if self.assist { "enabled" } else { "disabled" })?;
        writeln!(f, "  Log level: {}", self.log_level)?;
        Ok(())
    }
}
