//! Subcommand handlers
//!
//! Each handler returns the process exit code: 0 on success, 1 when a
//! pipeline or tool fails, 2 when the input is rejected before anything runs.

use super::commands::{
    CheckArgs, ClassifyArgs, LlmArgs, PublishArgs, ReadmeArgs, ReleaseArgs,
};
use super::output::{OutputFormatter, ToolStatus};
use crate::classify::ProjectClassifier;
use crate::command::CommandRunner;
use crate::config::PublisherConfig;
use crate::error::PipelineError;
use crate::progress::ProgressEvent;
use crate::publish::{validate_repo_name, PublishOutcome, PublishPipeline, PublishRequest};
use crate::readme::{DocumentGenerator, ReleaseData};
use crate::release::{AutoRelease, ReleasePipeline, ReleaseRequest};
use crate::task::{TaskError, TaskHandle, TaskRunner};
use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;

fn resolve_project_path(path: Option<&PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    if !path.is_dir() {
        bail!("Project path is not a directory: {}", path.display());
    }
    path.canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", path.display()))
}

fn resolve_config(llm: &LlmArgs, branch: Option<&String>) -> Result<PublisherConfig> {
    let default_config = PublisherConfig::default();
    let config = PublisherConfig {
        provider: llm.backend.unwrap_or(default_config.provider),
        model: llm.model.clone().unwrap_or(default_config.model),
        request_timeout_secs: llm.timeout.unwrap_or(default_config.request_timeout_secs),
        branch: branch.cloned().unwrap_or(default_config.branch),
        ..default_config
    };
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);
    Ok(config)
}

/// Generator backed by the configured assistant, or offline when disabled
fn document_generator(config: &PublisherConfig, use_assist: bool) -> DocumentGenerator {
    if !use_assist {
        return DocumentGenerator::offline();
    }
    match config.create_assistant() {
        Ok(assistant) => DocumentGenerator::with_assistant(assistant),
        Err(e) => {
            warn!("Assistant unavailable, continuing without it: {}", e);
            DocumentGenerator::offline()
        }
    }
}

fn repo_name(repo: Option<&String>, project_path: &Path) -> Result<String> {
    let name = match repo {
        Some(name) => name.trim().to_string(),
        None => ProjectClassifier::new(project_path).name().to_string(),
    };
    validate_repo_name(&name)?;
    Ok(name)
}

enum Step {
    Event(Option<ProgressEvent>),
    Interrupt,
}

async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Follows a task until its event stream closes; Ctrl-C cancels it
async fn drive<T>(mut handle: TaskHandle<T>) -> Result<T, TaskError> {
    loop {
        let step = tokio::select! {
            event = handle.next_event() => Step::Event(event),
            _ = interrupted() => Step::Interrupt,
        };

        match step {
            Step::Event(Some(ProgressEvent::Finished)) => debug!("Task finished"),
            Step::Event(Some(ProgressEvent::Failed { error })) => debug!("Task failed: {}", error),
            Step::Event(Some(ProgressEvent::Log { .. })) => {}
            Step::Event(None) => break,
            Step::Interrupt => {
                warn!("Interrupted, cancelling the running task");
                handle.cancel();
            }
        }
    }
    handle.wait().await
}

fn report<T>(result: Result<T, TaskError>, success: impl FnOnce(T) -> String) -> i32 {
    match result {
        Ok(value) => {
            info!("{}", success(value));
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            EXIT_FAILURE
        }
    }
}

pub async fn handle_publish(args: &PublishArgs, runner: &TaskRunner) -> i32 {
    let prepared = resolve_project_path(args.project_path.as_ref()).and_then(|path| {
        let name = repo_name(args.repo.as_ref(), &path)?;
        let config = resolve_config(&args.llm, args.branch.as_ref())?;
        Ok((path, name, config))
    });
    let (project_path, repo_name, config) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_INVALID_INPUT;
        }
    };

    let use_assist = config.assist && !args.no_assist;
    let generator = document_generator(&config, use_assist);
    let request = PublishRequest {
        project_path: project_path.clone(),
        repo_name: repo_name.clone(),
        use_assist,
        branch: config.branch.clone(),
    };
    let auto_release = args.release.then(|| AutoRelease {
        project_path,
        repo_name,
        screenshot: args.screenshot.clone(),
        branch: config.branch.clone(),
    });
    let release_generator = document_generator(&config, config.assist);

    let spawned = runner.spawn(move |progress| async move {
        let outcome = PublishPipeline::new(CommandRunner::system(), generator)
            .with_progress(progress.clone())
            .run(&request)
            .await?;

        let release = match auto_release {
            Some(auto) => {
                let runner = CommandRunner::system().with_progress(progress);
                Some(auto.run(runner, &release_generator).await?)
            }
            None => None,
        };
        Ok::<_, PipelineError>((outcome, release))
    });

    let handle = match spawned {
        Ok(handle) => handle,
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };

    report(drive(handle).await, |(outcome, release): (PublishOutcome, Option<ReleaseData>)| {
        let published = match outcome {
            PublishOutcome::Created => "Published to a new private repository".to_string(),
            PublishOutcome::Updated { url } => format!("Published to {}", url),
        };
        match release {
            Some(release) => format!("{}; release '{}' created", published, release.tag),
            None => published,
        }
    })
}

fn release_data(args: &ReleaseArgs) -> Result<Option<ReleaseData>> {
    let Some(tag) = &args.tag else {
        return Ok(None);
    };
    let notes = match &args.notes_file {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read notes file {}", path.display()))?,
        ),
        None => args.notes.clone(),
    };
    let release = ReleaseData {
        tag: tag.trim().to_string(),
        title: args.title.clone(),
        notes,
    };
    release.validate()?;
    Ok(Some(release))
}

pub async fn handle_release(args: &ReleaseArgs, runner: &TaskRunner) -> i32 {
    let prepared = resolve_project_path(args.project_path.as_ref()).and_then(|path| {
        let name = repo_name(args.repo.as_ref(), &path)?;
        let config = resolve_config(&args.llm, args.branch.as_ref())?;
        let release = release_data(args)?;
        Ok((path, name, config, release))
    });
    let (project_path, repo_name, config, release) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_INVALID_INPUT;
        }
    };

    let spawned = match release {
        Some(release) => {
            let request = ReleaseRequest {
                project_path,
                repo_name,
                release,
                screenshot: args.screenshot.clone(),
                branch: config.branch.clone(),
            };
            runner.spawn(move |progress| async move {
                ReleasePipeline::new(CommandRunner::system())
                    .with_progress(progress)
                    .run(&request)
                    .await?;
                Ok::<_, PipelineError>(request.release.tag)
            })
        }
        None => {
            let auto = AutoRelease {
                project_path,
                repo_name,
                screenshot: args.screenshot.clone(),
                branch: config.branch.clone(),
            };
            let generator = document_generator(&config, true);
            runner.spawn(move |progress| async move {
                let runner = CommandRunner::system().with_progress(progress);
                let release = auto.run(runner, &generator).await?;
                Ok::<_, PipelineError>(release.tag)
            })
        }
    };

    let handle = match spawned {
        Ok(handle) => handle,
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };

    report(drive(handle).await, |tag| format!("Release '{}' created", tag))
}

pub fn handle_classify(args: &ClassifyArgs) -> i32 {
    let project_path = match resolve_project_path(args.project_path.as_ref()) {
        Ok(path) => path,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_INVALID_INPUT;
        }
    };

    let desc = ProjectClassifier::new(&project_path).classify();
    match OutputFormatter::new(args.format.into()).format_description(&desc) {
        Ok(output) => {
            println!("{}", output.trim_end());
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}

pub async fn handle_readme(args: &ReadmeArgs) -> i32 {
    let prepared = resolve_project_path(args.project_path.as_ref())
        .and_then(|path| Ok((path, resolve_config(&args.llm, None)?)));
    let (project_path, config) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("{:#}", e);
            return EXIT_INVALID_INPUT;
        }
    };

    let use_assist = config.assist && !args.no_assist;
    let desc = ProjectClassifier::new(&project_path).classify();
    let readme = document_generator(&config, use_assist)
        .render_readme(&desc, use_assist)
        .await;

    if !args.write {
        print!("{}", readme);
        return EXIT_SUCCESS;
    }

    let path = project_path.join("README.md");
    match fs::write(&path, readme) {
        Ok(()) => {
            info!("Wrote {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Failed to write {}: {}", path.display(), e);
            EXIT_FAILURE
        }
    }
}

const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("git", "local commits and pushes"),
    ("gh", "repository creation and releases"),
];

pub fn handle_check(args: &CheckArgs) -> i32 {
    let tools: Vec<ToolStatus> = REQUIRED_TOOLS
        .iter()
        .map(|(name, purpose)| ToolStatus {
            name: name.to_string(),
            path: which::which(name)
                .ok()
                .map(|path| path.display().to_string()),
            purpose: purpose.to_string(),
        })
        .collect();

    match OutputFormatter::new(args.format.into()).format_tools(&tools) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            error!("{:#}", e);
            return EXIT_FAILURE;
        }
    }

    if tools.iter().all(ToolStatus::available) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use tempfile::TempDir;

    fn release_args(tag: Option<&str>) -> ReleaseArgs {
        ReleaseArgs {
            project_path: None,
            repo: None,
            tag: tag.map(str::to_string),
            title: None,
            notes: None,
            notes_file: None,
            screenshot: None,
            draft: false,
            branch: None,
            llm: LlmArgs {
                backend: None,
                model: None,
                timeout: None,
            },
        }
    }

    #[test]
    fn test_repo_name_defaults_to_folder() {
        let temp = TempDir::new().unwrap();
        let folder = temp.path().join("weather-cli");
        fs::create_dir(&folder).unwrap();

        assert_eq!(repo_name(None, &folder).unwrap(), "weather-cli");
        assert_eq!(
            repo_name(Some(&"other".to_string()), &folder).unwrap(),
            "other"
        );
        assert!(repo_name(Some(&"two words".to_string()), &folder).is_err());
        assert_eq!(
            repo_name(Some(&"my-org/tool".to_string()), &folder).unwrap(),
            "my-org/tool"
        );
        assert!(repo_name(Some(&"--web".to_string()), &folder).is_err());
        assert!(repo_name(Some(&"a/b/c".to_string()), &folder).is_err());
        assert!(repo_name(Some(&"..".to_string()), &folder).is_err());
    }

    #[test]
    fn test_missing_project_path_rejected() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_project_path(Some(&temp.path().join("nope"))).is_err());
        assert!(resolve_project_path(Some(&temp.path().to_path_buf())).is_ok());
    }

    #[test]
    fn test_release_data_from_args() {
        assert!(release_data(&release_args(None)).unwrap().is_none());
        assert!(release_data(&release_args(Some("   "))).is_err());

        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes.md");
        fs::write(&notes, "## What's new\n- CLI").unwrap();
        let mut args = release_args(Some("v2.0.0"));
        args.notes_file = Some(notes);

        let release = release_data(&args).unwrap().unwrap();
        assert_eq!(release.tag, "v2.0.0");
        assert_eq!(release.notes(), Some("## What's new\n- CLI"));
    }

    #[tokio::test]
    async fn test_empty_tag_is_invalid_input() {
        let runner = TaskRunner::new();
        let temp = TempDir::new().unwrap();
        let mut args = release_args(Some(""));
        args.project_path = Some(temp.path().to_path_buf());

        assert_eq!(handle_release(&args, &runner).await, EXIT_INVALID_INPUT);
        assert!(!runner.is_busy());
    }

    #[test]
    fn test_classify_missing_dir_is_invalid_input() {
        let temp = TempDir::new().unwrap();
        let args = ClassifyArgs {
            project_path: Some(temp.path().join("missing")),
            format: OutputFormatArg::Json,
        };
        assert_eq!(handle_classify(&args), EXIT_INVALID_INPUT);
    }
}
