//! Publishing a project folder as a fresh GitHub repository
//!
//! [`PublishPipeline::run`] writes a README, wipes any previous `.git`,
//! commits the tree as a single initial commit and then either force-pushes to
//! an existing repository or creates a new private one with `gh`.

mod pipeline;
mod repo_name;
mod reset;

pub use pipeline::{PublishOutcome, PublishPipeline, PublishRequest};
pub use repo_name::validate_repo_name;
pub use reset::{reset_version_control, ResetError};
