use super::repo_name::validate_repo_name;
use super::reset::reset_version_control;
use crate::classify::ProjectClassifier;
use crate::command::{CommandError, CommandLine, CommandRunner};
use crate::error::PipelineError;
use crate::progress::ProgressHandler;
use crate::readme::DocumentGenerator;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const README_FILE: &str = "README.md";
const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// stderr fragments `gh repo view` prints when the repository is missing
const NOT_FOUND_MARKERS: &[&str] = &["could not resolve to a repository", "not found"];

/// What to publish and where
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub project_path: PathBuf,
    pub repo_name: String,
    pub use_assist: bool,
    pub branch: String,
}

/// How the remote was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "remote", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// The repository existed and was overwritten by a force push
    Updated { url: String },
    /// A new private repository was created
    Created,
}

/// Publishes a folder as a single-commit repository
pub struct PublishPipeline {
    runner: CommandRunner,
    generator: DocumentGenerator,
}

impl PublishPipeline {
    pub fn new(runner: CommandRunner, generator: DocumentGenerator) -> Self {
        Self { runner, generator }
    }

    /// Routes all pipeline output (commands, generator, classifier) to `progress`
    pub fn with_progress(self, progress: Arc<dyn ProgressHandler>) -> Self {
        Self {
            runner: self.runner.with_progress(progress.clone()),
            generator: self.generator.with_progress(progress),
        }
    }

    fn progress(&self) -> &dyn ProgressHandler {
        self.runner.progress().as_ref()
    }

    pub async fn run(&self, request: &PublishRequest) -> Result<PublishOutcome, PipelineError> {
        validate_repo_name(&request.repo_name)?;
        let root = request.project_path.as_path();
        let progress = self.progress();
        progress.log(&format!(
            "Publishing {} as '{}'",
            root.display(),
            request.repo_name
        ));

        let desc = ProjectClassifier::new(root)
            .with_name(&request.repo_name)
            .with_progress(self.runner.progress().clone())
            .classify();

        let readme = self.generator.render_readme(&desc, request.use_assist).await;
        let readme_path = root.join(README_FILE);
        fs::write(&readme_path, readme).map_err(|e| PipelineError::io("write", &readme_path, e))?;
        progress.log("README.md written");

        reset_version_control(root, progress)?;

        self.git(&["init", "-b", &request.branch], request).await?;
        self.git(&["add", "."], request).await?;
        self.git(&["commit", "-m", INITIAL_COMMIT_MESSAGE], request).await?;

        let outcome = match self.lookup_remote(request).await? {
            Some(url) => {
                progress.log(&format!(
                    "Repository '{}' already exists, pushing to {}",
                    request.repo_name, url
                ));
                if let Err(e) = self.git(&["remote", "remove", "origin"], request).await {
                    progress.log(&format!("No origin remote to remove: {}", e));
                }
                self.git(&["remote", "add", "origin", &url], request).await?;
                self.git(
                    &["push", "--force", "--set-upstream", "origin", &request.branch],
                    request,
                )
                .await?;
                PublishOutcome::Updated { url }
            }
            None => {
                progress.log(&format!(
                    "Creating private repository '{}'...",
                    request.repo_name
                ));
                let create = CommandLine::gh(["repo", "create"])
                    .arg(&request.repo_name)
                    .args(["--private", "--source=.", "--push"]);
                self.runner.run(&create, root).await?;
                PublishOutcome::Created
            }
        };

        progress.log(&format!(
            "Project published to GitHub as '{}'",
            request.repo_name
        ));
        Ok(outcome)
    }

    /// Remote URL when the repository exists
    ///
    /// Any nonzero exit counts as "does not exist". Failures that do not look
    /// like a missing repository are logged as warnings before failing open.
    async fn lookup_remote(&self, request: &PublishRequest) -> Result<Option<String>, PipelineError> {
        let view = CommandLine::gh(["repo", "view"])
            .arg(&request.repo_name)
            .args(["--json", "url", "--jq", ".url"]);

        match self.runner.run(&view, &request.project_path).await {
            Ok(result) => {
                let url = result.stdout.trim();
                if url.is_empty() {
                    warn!(repo = %request.repo_name, "Repository lookup succeeded without a URL");
                    self.progress()
                        .log("Repository lookup returned no URL, treating the repository as missing");
                    Ok(None)
                } else {
                    Ok(Some(url.to_string()))
                }
            }
            Err(CommandError::Failed { stderr, exit_code, .. }) => {
                let lowered = stderr.to_lowercase();
                if !NOT_FOUND_MARKERS.iter().any(|m| lowered.contains(m)) {
                    warn!(
                        repo = %request.repo_name,
                        exit_code,
                        stderr = %stderr.trim(),
                        "Repository lookup failed for an unclear reason, assuming it does not exist"
                    );
                }
                self.progress().log(&format!(
                    "Repository '{}' not found",
                    request.repo_name
                ));
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn git(&self, args: &[&str], request: &PublishRequest) -> Result<(), CommandError> {
        let command = CommandLine::git(args.iter().copied());
        self.runner.run(&command, &request.project_path).await.map(|_| ())
    }
}
