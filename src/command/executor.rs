use super::line::CommandLine;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Captured outcome of one process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    /// -1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl CommandResult {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns processes and waits for them
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    async fn execute(&self, command: &CommandLine, cwd: &Path) -> std::io::Result<CommandResult>;
}

/// Executor backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

#[async_trait]
impl ProcessExecutor for SystemExecutor {
    async fn execute(&self, command: &CommandLine, cwd: &Path) -> std::io::Result<CommandResult> {
        let output = Command::new(command.program())
            .args(command.os_args())
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
