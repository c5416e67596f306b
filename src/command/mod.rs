//! External command execution
//!
//! Commands are argument vectors ([`CommandLine`]) and never pass through a
//! shell. [`CommandRunner`] logs each invocation, captures both streams and
//! turns a nonzero exit into [`CommandError::Failed`]. Spawning sits behind
//! [`ProcessExecutor`] so pipelines can be driven by [`ScriptedExecutor`].

mod error;
mod executor;
mod line;
mod runner;
mod scripted;

pub use error::CommandError;
pub use executor::{CommandResult, ProcessExecutor, SystemExecutor};
pub use line::CommandLine;
pub use runner::CommandRunner;
pub use scripted::ScriptedExecutor;
