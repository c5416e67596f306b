//! Text generation for README and release drafting
//!
//! [`Assistant`] owns the two calls the pipelines make. It talks to any
//! [`LLMClient`]: [`GenAIClient`] in production, [`MockLLMClient`] in tests.

mod assistant;
mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use assistant::Assistant;
pub use client::LLMClient;
pub use error::BackendError;
pub use genai::GenAIClient;
pub use mock::MockLLMClient;
pub use types::{Completion, Prompt, DRAFT_TEMPERATURE};
