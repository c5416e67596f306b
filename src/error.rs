//! Pipeline error taxonomy

use crate::command::CommandError;
use crate::publish::ResetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a publish or release run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Reset(#[from] ResetError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid release: {0}")]
    InvalidRelease(String),

    #[error("Invalid repository name '{0}': expected NAME or OWNER/NAME using letters, digits, '.', '-' and '_', not starting with '-'")]
    InvalidRepoName(String),
}

impl PipelineError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = PipelineError::from(CommandError::Failed {
            exit_code: 128,
            command: "git push --force --set-upstream origin main".to_string(),
            stderr: String::new(),
        });
        assert_eq!(
            err.to_string(),
            "Command failed with exit code 128: git push --force --set-upstream origin main"
        );

        let err = PipelineError::io(
            "write",
            "/tmp/p/README.md",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(err.to_string(), "Failed to write /tmp/p/README.md: disk full");
    }
}
