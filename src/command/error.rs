use thiserror::Error;

/// Errors raised while running an external command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed with exit code {exit_code}: {command}")]
    Failed {
        exit_code: i32,
        command: String,
        stderr: String,
    },
}

impl CommandError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Failed { exit_code, .. } => Some(*exit_code),
            CommandError::Spawn { .. } => None,
        }
    }
}
