use super::prompt::readme_prompt;
use super::release_info::{parse_release_info, ReleaseData, ReleaseInfoParse};
use super::render::render_readme;
use crate::classify::ProjectDescription;
use crate::llm::Assistant;
use crate::progress::{LoggingHandler, ProgressHandler};
use std::sync::Arc;

/// Produces README text and release data for a classified project
///
/// Assistant failures never surface: README generation falls back to the
/// deterministic renderer and release drafting to [`ReleaseData::default`].
#[derive(Clone)]
pub struct DocumentGenerator {
    assistant: Option<Assistant>,
    progress: Arc<dyn ProgressHandler>,
}

impl DocumentGenerator {
    /// Generator that never calls a text generator
    pub fn offline() -> Self {
        Self {
            assistant: None,
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_assistant(assistant: Assistant) -> Self {
        Self {
            assistant: Some(assistant),
            progress: Arc::new(LoggingHandler),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressHandler>) -> Self {
        self.progress = progress;
        self
    }

    pub fn has_assistant(&self) -> bool {
        self.assistant.is_some()
    }

    pub async fn render_readme(&self, desc: &ProjectDescription, use_assist: bool) -> String {
        let assistant = match (&self.assistant, use_assist) {
            (Some(assistant), true) => assistant,
            (None, true) => {
                self.progress
                    .log("No assistant configured, generating README.md without it");
                return render_readme(desc);
            }
            (_, false) => {
                self.progress.log("Generating README.md without the assistant");
                return render_readme(desc);
            }
        };

        self.progress.log("Generating README.md with the assistant...");
        match assistant.generate_readme(&readme_prompt(desc)).await {
            Ok(text) => format!("{}\n", text),
            Err(e) => {
                self.progress
                    .log(&format!("Assistant failed to generate README.md: {}", e));
                self.progress.log("Using the default README layout instead");
                render_readme(desc)
            }
        }
    }

    /// Drafts release data with the assistant, or returns the defaults
    pub async fn draft_release(&self, desc: &ProjectDescription) -> ReleaseData {
        let Some(assistant) = &self.assistant else {
            self.progress
                .log("No assistant configured, using default release data");
            return ReleaseData::default();
        };

        self.progress.log("Generating release information with the assistant...");
        let raw = match assistant.generate_release_info(desc).await {
            Ok(raw) => raw,
            Err(e) => {
                self.progress
                    .log(&format!("Failed to generate release information: {}", e));
                return ReleaseData::default();
            }
        };

        match parse_release_info(&raw) {
            ReleaseInfoParse::Parsed(data) => data,
            ReleaseInfoParse::Malformed(reason) => {
                self.progress.log(&format!(
                    "Could not parse release JSON from the assistant: {}. Using defaults",
                    reason
                ));
                ReleaseData::default()
            }
            ReleaseInfoParse::Absent => {
                self.progress
                    .log("No JSON found in the assistant's answer. Using defaults");
                ReleaseData::default()
            }
        }
    }
}

impl std::fmt::Debug for DocumentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentGenerator")
            .field("assistant", &self.assistant)
            .finish()
    }
}
