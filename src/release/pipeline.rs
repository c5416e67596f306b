use super::screenshot::{
    is_attachable, stage_screenshot, upsert_screenshot_section, StagedScreenshot, SCREENSHOTS_DIR,
};
use crate::command::{CommandError, CommandLine, CommandRunner};
use crate::error::PipelineError;
use crate::publish::validate_repo_name;
use crate::progress::ProgressHandler;
use crate::readme::ReleaseData;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Temporary release-notes file, written to the project root
pub const NOTES_FILE: &str = "temp_release_notes.md";

const README_FILE: &str = "README.md";
const SCREENSHOT_COMMIT_MESSAGE: &str = "Add screenshot to README";

/// Release to create for a published project
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub project_path: PathBuf,
    pub repo_name: String,
    pub release: ReleaseData,
    pub screenshot: Option<PathBuf>,
    pub branch: String,
}

/// Creates a GitHub release, optionally with a screenshot asset
pub struct ReleasePipeline {
    runner: CommandRunner,
}

impl ReleasePipeline {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    pub fn with_progress(self, progress: Arc<dyn ProgressHandler>) -> Self {
        Self {
            runner: self.runner.with_progress(progress),
        }
    }

    fn progress(&self) -> &dyn ProgressHandler {
        self.runner.progress().as_ref()
    }

    pub async fn run(&self, request: &ReleaseRequest) -> Result<(), PipelineError> {
        request.release.validate()?;
        validate_repo_name(&request.repo_name)?;
        let root = request.project_path.as_path();
        let progress = self.progress();
        progress.log(&format!(
            "Creating release '{}' for repository '{}'",
            request.release.tag, request.repo_name
        ));

        let staged = match &request.screenshot {
            Some(source) if source.exists() => {
                let staged = stage_screenshot(root, source)
                    .map_err(|e| PipelineError::io("stage screenshot", source, e))?;
                self.patch_readme(root, &staged);
                self.commit_and_push(request).await;
                Some(staged)
            }
            Some(source) => {
                progress.log(&format!(
                    "Screenshot {} not found, releasing without it",
                    source.display()
                ));
                None
            }
            None => None,
        };

        let notes_path = match request.release.notes() {
            Some(notes) => {
                let path = root.join(NOTES_FILE);
                fs::write(&path, notes).map_err(|e| PipelineError::io("write", &path, e))?;
                Some(path)
            }
            None => None,
        };

        let command = self.release_command(&request.release, notes_path.is_some(), staged.as_ref());
        let result = self.runner.run(&command, root).await;

        if let Some(path) = notes_path {
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "Failed to remove release notes file");
            }
        }
        result?;

        progress.log(&format!(
            "Release '{}' created for repository '{}'",
            request.release.tag, request.repo_name
        ));
        Ok(())
    }

    fn release_command(
        &self,
        release: &ReleaseData,
        with_notes: bool,
        staged: Option<&StagedScreenshot>,
    ) -> CommandLine {
        let mut command = CommandLine::gh(["release", "create"]).arg(&release.tag);
        if let Some(title) = release.title() {
            command = command.args(["--title", title]);
        }
        if with_notes {
            command = command.args(["--notes-file", NOTES_FILE]);
        }

        if let Some(staged) = staged {
            match is_attachable(&staged.path) {
                Ok(true) => command = command.arg(&staged.relative),
                Ok(false) => {
                    warn!(asset = %staged.relative, "Asset exceeds the 2 GiB upload limit");
                    self.progress().log(&format!(
                        "Screenshot {} is larger than 2 GiB, not attaching it to the release",
                        staged.relative
                    ));
                }
                Err(e) => self.progress().log(&format!(
                    "Cannot read screenshot {}: {}, not attaching it",
                    staged.relative, e
                )),
            }
        }
        command
    }

    /// Best-effort; a missing README is skipped
    fn patch_readme(&self, root: &Path, staged: &StagedScreenshot) {
        let path = root.join(README_FILE);
        if !path.exists() {
            self.progress()
                .log("README.md not found, the screenshot will not be referenced");
            return;
        }

        let patched = fs::read_to_string(&path)
            .map(|content| upsert_screenshot_section(&content, &staged.relative))
            .and_then(|patched| fs::write(&path, patched));
        match patched {
            Ok(()) => self.progress().log("Screenshot added to README.md"),
            Err(e) => self
                .progress()
                .log(&format!("Failed to add the screenshot to README.md: {}", e)),
        }
    }

    /// Failures are logged and do not abort the release
    async fn commit_and_push(&self, request: &ReleaseRequest) {
        match self.push_screenshot_commit(request).await {
            Ok(()) => self
                .progress()
                .log("README.md changes committed and pushed"),
            Err(e) => self
                .progress()
                .log(&format!("Failed to commit and push README changes: {}", e)),
        }
    }

    async fn push_screenshot_commit(&self, request: &ReleaseRequest) -> Result<(), CommandError> {
        let steps = [
            CommandLine::git(["add", README_FILE, SCREENSHOTS_DIR]),
            CommandLine::git(["commit", "-m", SCREENSHOT_COMMIT_MESSAGE]),
            CommandLine::git(["push", "origin"]).arg(&request.branch),
        ];
        for step in &steps {
            self.runner.run(step, &request.project_path).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ScriptedExecutor;
    use crate::progress::RecordingHandler;
    use tempfile::TempDir;

    fn pipeline() -> (Arc<ScriptedExecutor>, Arc<RecordingHandler>, ReleasePipeline) {
        let executor = Arc::new(ScriptedExecutor::new());
        let recorder = Arc::new(RecordingHandler::new());
        let runner = CommandRunner::new(executor.clone(), recorder.clone());
        (executor, recorder, ReleasePipeline::new(runner))
    }

    fn request(root: &Path, release: ReleaseData) -> ReleaseRequest {
        ReleaseRequest {
            project_path: root.to_path_buf(),
            repo_name: "demo".to_string(),
            release,
            screenshot: None,
            branch: "main".to_string(),
        }
    }

    #[tokio::test]
    async fn test_minimal_release() {
        let temp = TempDir::new().unwrap();
        let (executor, _, pipeline) = pipeline();

        pipeline
            .run(&request(temp.path(), ReleaseData::new("v1.2.0")))
            .await
            .unwrap();

        assert_eq!(executor.rendered_calls(), vec!["gh release create v1.2.0"]);
    }

    #[tokio::test]
    async fn test_title_and_notes() {
        let temp = TempDir::new().unwrap();
        let (executor, _, pipeline) = pipeline();
        let release = ReleaseData::new("v1.0.0")
            .with_title("First release")
            .with_notes("## What's new\n- Everything");

        pipeline.run(&request(temp.path(), release)).await.unwrap();

        assert_eq!(
            executor.rendered_calls(),
            vec!["gh release create v1.0.0 --title 'First release' --notes-file temp_release_notes.md"]
        );
        assert!(!temp.path().join(NOTES_FILE).exists());
    }

    #[tokio::test]
    async fn test_empty_tag_rejected_before_any_command() {
        let temp = TempDir::new().unwrap();
        let (executor, _, pipeline) = pipeline();

        let err = pipeline
            .run(&request(temp.path(), ReleaseData::new("")))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidRelease(_)));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_option_like_tag_rejected_before_any_command() {
        let temp = TempDir::new().unwrap();
        let (executor, _, pipeline) = pipeline();
        let release = ReleaseData::new("--draft").with_title("x");

        let err = pipeline
            .run(&request(temp.path(), release))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidRelease(_)));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_screenshot_is_skipped() {
        let temp = TempDir::new().unwrap();
        let (executor, recorder, pipeline) = pipeline();
        let mut req = request(temp.path(), ReleaseData::new("v1"));
        req.screenshot = Some(temp.path().join("nope.png"));

        pipeline.run(&req).await.unwrap();

        assert_eq!(executor.rendered_calls(), vec!["gh release create v1"]);
        assert!(recorder.contains("not found"));
    }
}
