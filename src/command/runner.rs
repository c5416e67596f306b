use super::error::CommandError;
use super::executor::{CommandResult, ProcessExecutor, SystemExecutor};
use super::line::CommandLine;
use crate::progress::{LoggingHandler, ProgressHandler};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs one command at a time, reporting through a progress handler
#[derive(Clone)]
pub struct CommandRunner {
    executor: Arc<dyn ProcessExecutor>,
    progress: Arc<dyn ProgressHandler>,
}

impl CommandRunner {
    pub fn new(executor: Arc<dyn ProcessExecutor>, progress: Arc<dyn ProgressHandler>) -> Self {
        Self { executor, progress }
    }

    /// Runner spawning real processes and logging through tracing
    pub fn system() -> Self {
        Self::new(Arc::new(SystemExecutor), Arc::new(LoggingHandler))
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn progress(&self) -> &Arc<dyn ProgressHandler> {
        &self.progress
    }

    /// Runs `command` in `cwd`; a nonzero exit becomes [`CommandError::Failed`]
    pub async fn run(&self, command: &CommandLine, cwd: &Path) -> Result<CommandResult, CommandError> {
        let rendered = command.to_string();
        self.progress
            .log(&format!("Running: {} in {}", rendered, cwd.display()));

        let result = self
            .executor
            .execute(command, cwd)
            .await
            .map_err(|source| CommandError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        let stdout = result.stdout.trim();
        if !stdout.is_empty() {
            self.progress.log(&format!("stdout: {}", stdout));
        }
        let stderr = result.stderr.trim();
        if !stderr.is_empty() {
            self.progress.log(&format!("stderr: {}", stderr));
        }

        if !result.success() {
            debug!(exit_code = result.exit_code, command = %rendered, "Command failed");
            return Err(CommandError::Failed {
                exit_code: result.exit_code,
                command: rendered,
                stderr: result.stderr,
            });
        }

        Ok(result)
    }
}

impl std::fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRunner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ScriptedExecutor;
    use crate::progress::RecordingHandler;

    fn runner(executor: Arc<ScriptedExecutor>) -> (CommandRunner, Arc<RecordingHandler>) {
        let recorder = Arc::new(RecordingHandler::new());
        (CommandRunner::new(executor, recorder.clone()), recorder)
    }

    #[tokio::test]
    async fn test_logs_command_and_streams() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(&["gh", "repo", "view"], CommandResult::ok("https://github.com/u/r\n"));
        let (runner, recorder) = runner(executor);

        let result = runner
            .run(&CommandLine::gh(["repo", "view", "r"]), Path::new("/tmp/p"))
            .await
            .unwrap();

        assert_eq!(result.stdout.trim(), "https://github.com/u/r");
        assert_eq!(
            recorder.messages(),
            vec![
                "Running: gh repo view r in /tmp/p".to_string(),
                "stdout: https://github.com/u/r".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_once() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.respond(&["git", "push"], CommandResult::failed(1, "rejected"));
        let (runner, recorder) = runner(executor.clone());

        let err = runner
            .run(&CommandLine::git(["push"]), Path::new("."))
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        assert!(matches!(err, CommandError::Failed { ref stderr, .. } if stderr == "rejected"));
        assert_eq!(executor.calls().len(), 1);
        assert!(recorder.contains("stderr: rejected"));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let executor = Arc::new(ScriptedExecutor::new());
        executor.spawn_error(&["gh"]);
        let (runner, _) = runner(executor);

        let err = runner
            .run(&CommandLine::gh(["--version"]), Path::new("."))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }
}
