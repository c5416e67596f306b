use super::executor::{CommandResult, ProcessExecutor};
use super::line::CommandLine;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

type Observer = Box<dyn Fn(&CommandLine, &Path) + Send + Sync>;

enum Outcome {
    Result(CommandResult),
    SpawnError,
}

struct Rule {
    prefix: Vec<String>,
    outcome: Outcome,
}

/// Executor that records commands and answers from a script
///
/// Unmatched commands succeed with empty output. When several rules match,
/// the most recently added one wins.
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<(CommandLine, PathBuf)>>,
    observers: Mutex<Vec<Observer>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers commands starting with `prefix` (program first) with `result`
    pub fn respond(&self, prefix: &[&str], result: CommandResult) {
        self.push_rule(prefix, Outcome::Result(result));
    }

    pub fn fail(&self, prefix: &[&str], exit_code: i32, stderr: &str) {
        self.respond(prefix, CommandResult::failed(exit_code, stderr));
    }

    /// Makes commands starting with `prefix` fail to spawn
    pub fn spawn_error(&self, prefix: &[&str]) {
        self.push_rule(prefix, Outcome::SpawnError);
    }

    /// Runs `observer` on every command before it is answered
    pub fn observe(&self, observer: impl Fn(&CommandLine, &Path) + Send + Sync + 'static) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(observer));
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    pub fn working_dirs(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cwd)| cwd.clone())
            .collect()
    }

    /// Shell renderings of every call, in order
    pub fn rendered_calls(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    pub fn was_called(&self, prefix: &[&str]) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    fn push_rule(&self, prefix: &[&str], outcome: Outcome) {
        self.rules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Rule {
                prefix: prefix.iter().map(|s| s.to_string()).collect(),
                outcome,
            });
    }
}

#[async_trait]
impl ProcessExecutor for ScriptedExecutor {
    async fn execute(&self, command: &CommandLine, cwd: &Path) -> io::Result<CommandResult> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((command.clone(), cwd.to_path_buf()));

        for observer in self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            observer(command, cwd);
        }

        let rules = self.rules.lock().unwrap_or_else(PoisonError::into_inner);
        let matched = rules.iter().rev().find(|rule| {
            let prefix: Vec<&str> = rule.prefix.iter().map(String::as_str).collect();
            command.starts_with(&prefix)
        });

        match matched.map(|rule| &rule.outcome) {
            Some(Outcome::Result(result)) => Ok(result.clone()),
            Some(Outcome::SpawnError) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: program not found", command.program()),
            )),
            None => Ok(CommandResult::default()),
        }
    }
}

impl std::fmt::Debug for ScriptedExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedExecutor")
            .field("calls", &self.rendered_calls())
            .finish()
    }
}
