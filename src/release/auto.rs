use super::pipeline::{ReleasePipeline, ReleaseRequest};
use crate::classify::ProjectClassifier;
use crate::command::CommandRunner;
use crate::error::PipelineError;
use crate::readme::{DocumentGenerator, ReleaseData};
use std::path::PathBuf;

/// Inputs for releasing right after a publish
#[derive(Debug, Clone)]
pub struct AutoRelease {
    pub project_path: PathBuf,
    pub repo_name: String,
    pub screenshot: Option<PathBuf>,
    pub branch: String,
}

impl AutoRelease {
    /// Re-classifies the published folder, drafts release data and creates the release
    ///
    /// Drafting falls back to [`ReleaseData::default`] whenever the assistant is
    /// missing, fails or answers without usable JSON.
    pub async fn run(
        &self,
        runner: CommandRunner,
        generator: &DocumentGenerator,
    ) -> Result<ReleaseData, PipelineError> {
        let progress = runner.progress().clone();
        progress.log("Starting automatic release");

        let desc = ProjectClassifier::new(&self.project_path)
            .with_name(&self.repo_name)
            .with_progress(progress.clone())
            .classify();

        let release = generator
            .clone()
            .with_progress(progress.clone())
            .draft_release(&desc)
            .await;
        progress.log(&format!(
            "Drafted release '{}' for repository '{}'",
            release.tag, self.repo_name
        ));

        let request = ReleaseRequest {
            project_path: self.project_path.clone(),
            repo_name: self.repo_name.clone(),
            release: release.clone(),
            screenshot: self.screenshot.clone(),
            branch: self.branch.clone(),
        };
        ReleasePipeline::new(runner).run(&request).await?;
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ScriptedExecutor;
    use crate::llm::{Assistant, MockLLMClient};
    use crate::progress::RecordingHandler;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_drafted_release_is_created() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "flask\n").unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        let runner = CommandRunner::new(executor.clone(), Arc::new(RecordingHandler::new()));
        let mock = Arc::new(MockLLMClient::new());
        mock.reply("{\"tag\": \"v0.9.0\", \"title\": \"Preview\", \"notes\": \"- flask app\"}");
        let generator = DocumentGenerator::with_assistant(Assistant::new(mock.clone()));

        let auto = AutoRelease {
            project_path: temp.path().to_path_buf(),
            repo_name: "weather".to_string(),
            screenshot: None,
            branch: "main".to_string(),
        };
        let release = auto.run(runner, &generator).await.unwrap();

        assert_eq!(release.tag, "v0.9.0");
        assert_eq!(
            executor.rendered_calls(),
            vec!["gh release create v0.9.0 --title Preview --notes-file temp_release_notes.md"]
        );
        assert!(mock.last_task().unwrap().contains("\"type\": \"Python\""));
    }

    #[tokio::test]
    async fn test_offline_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let executor = Arc::new(ScriptedExecutor::new());
        let runner = CommandRunner::new(executor.clone(), Arc::new(RecordingHandler::new()));

        let auto = AutoRelease {
            project_path: temp.path().to_path_buf(),
            repo_name: "demo".to_string(),
            screenshot: None,
            branch: "main".to_string(),
        };
        let release = auto
            .run(runner, &DocumentGenerator::offline())
            .await
            .unwrap();

        assert_eq!(release, ReleaseData::default());
        assert!(executor.was_called(&["gh", "release", "create", "v1.0.0", "--title", "Release v1.0.0"]));
    }
}
