//! ghpublish - publish a local project folder to GitHub and cut a release
//!
//! The library classifies a project directory, drafts its README (optionally
//! with an LLM), replaces its version-control state with a single initial
//! commit and pushes it with the `gh` CLI. A second pipeline creates a tagged
//! release, optionally staging a screenshot into the README and the release
//! assets.
//!
//! # Example
//!
//! ```no_run
//! use ghpublish::{CommandRunner, DocumentGenerator, PublishPipeline, PublishRequest};
//!
//! # async fn example() -> Result<(), ghpublish::PipelineError> {
//! let pipeline = PublishPipeline::new(CommandRunner::system(), DocumentGenerator::offline());
//! let outcome = pipeline
//!     .run(&PublishRequest {
//!         project_path: "./weather-cli".into(),
//!         repo_name: "weather-cli".to_string(),
//!         use_assist: false,
//!         branch: "main".to_string(),
//!     })
//!     .await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`classify`]: heuristic project classification
//! - [`readme`]: README rendering and release-notes drafting
//! - [`command`]: external command execution
//! - [`publish`] / [`release`]: the two pipelines
//! - [`task`]: one background pipeline at a time
//! - [`llm`]: LLM client abstraction

pub mod classify;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod llm;
pub mod progress;
pub mod publish;
pub mod readme;
pub mod release;
pub mod task;
pub mod util;

pub use classify::{classify, Platform, ProjectClassifier, ProjectDescription, ProjectType};
pub use command::{CommandError, CommandLine, CommandResult, CommandRunner};
pub use config::{ConfigError, PublisherConfig};
pub use error::PipelineError;
pub use llm::{Assistant, BackendError, GenAIClient, LLMClient};
pub use progress::{ProgressEvent, ProgressHandler};
pub use publish::{PublishOutcome, PublishPipeline, PublishRequest};
pub use readme::{DocumentGenerator, ReleaseData, ReleaseInfoParse};
pub use release::{AutoRelease, ReleasePipeline, ReleaseRequest};
pub use task::{TaskError, TaskHandle, TaskRunner};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
