//! Errors raised while drafting text

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("model returned an empty answer")]
    EmptyResponse,

    #[error("invalid assistant configuration: {0}")]
    Configuration(String),

    #[error("no scripted answer left")]
    Exhausted,
}
