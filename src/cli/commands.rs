use clap::{Args, Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// Publish a local project folder to GitHub and cut a release
#[derive(Parser, Debug)]
#[command(
    name = "ghpublish",
    about = "Publish a local project folder to GitHub and cut a release",
    version,
    long_about = "ghpublish classifies a project folder, writes a README (optionally drafted \
                  by an LLM), commits the folder as a fresh repository and pushes it to GitHub \
                  with the gh CLI. It can then create a release with notes and a screenshot."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose output (debug logging)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Publish a folder as a new GitHub repository",
        long_about = "Writes README.md, replaces any existing .git folder with a single \
                      initial commit and pushes it. An existing repository of the same name \
                      is force-pushed; otherwise a private one is created.\n\n\
                      Examples:\n  \
                      ghpublish publish\n  \
                      ghpublish publish ./my-tool --repo my-tool --no-assist\n  \
                      ghpublish publish ./my-tool --release --screenshot shot.png"
    )]
    Publish(PublishArgs),

    #[command(
        about = "Create a GitHub release for a published folder",
        long_about = "Creates a release with gh. A screenshot is copied into screenshots/, \
                      referenced from README.md, committed and attached to the release.\n\n\
                      Examples:\n  \
                      ghpublish release --tag v1.0.0 --title 'First release'\n  \
                      ghpublish release ./my-tool --draft --screenshot shot.png"
    )]
    Release(ReleaseArgs),

    #[command(about = "Show what ghpublish infers about a project folder")]
    Classify(ClassifyArgs),

    #[command(about = "Render the README that publish would write")]
    Readme(ReadmeArgs),

    #[command(about = "Check that git and gh are installed")]
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LlmArgs {
    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "LLM provider (overrides GHPUBLISH_PROVIDER)"
    )]
    pub backend: Option<AdapterKind>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model name (overrides GHPUBLISH_MODEL)")]
    pub model: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "LLM request timeout in seconds")]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct PublishArgs {
    #[arg(value_name = "PATH", help = "Project folder (defaults to current directory)")]
    pub project_path: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Repository name (defaults to the folder name)")]
    pub repo: Option<String>,

    #[arg(long, help = "Write the README without the LLM assistant")]
    pub no_assist: bool,

    #[arg(long, help = "Create a release right after a successful publish")]
    pub release: bool,

    #[arg(long, value_name = "FILE", requires = "release", help = "Screenshot for the release")]
    pub screenshot: Option<PathBuf>,

    #[arg(long, value_name = "BRANCH", help = "Branch to create and push (overrides GHPUBLISH_BRANCH)")]
    pub branch: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleaseArgs {
    #[arg(value_name = "PATH", help = "Project folder (defaults to current directory)")]
    pub project_path: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Repository name (defaults to the folder name)")]
    pub repo: Option<String>,

    #[arg(long, required_unless_present = "draft", help = "Release tag, e.g. v1.0.0")]
    pub tag: Option<String>,

    #[arg(long, help = "Release title")]
    pub title: Option<String>,

    #[arg(long, conflicts_with = "notes_file", help = "Release notes (Markdown)")]
    pub notes: Option<String>,

    #[arg(long, value_name = "FILE", help = "Read release notes from a file")]
    pub notes_file: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Screenshot to stage, reference and attach")]
    pub screenshot: Option<PathBuf>,

    #[arg(long, help = "Draft tag, title and notes with the LLM assistant")]
    pub draft: bool,

    #[arg(long, value_name = "BRANCH", help = "Branch the screenshot commit is pushed to")]
    pub branch: Option<String>,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(value_name = "PATH", help = "Project folder (defaults to current directory)")]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ReadmeArgs {
    #[arg(value_name = "PATH", help = "Project folder (defaults to current directory)")]
    pub project_path: Option<PathBuf>,

    #[arg(long, help = "Render without the LLM assistant")]
    pub no_assist: bool,

    #[arg(long, help = "Write README.md into the folder instead of printing it")]
    pub write: bool,

    #[command(flatten)]
    pub llm: LlmArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    crate::config::parse_provider(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_publish_args() {
        let args = CliArgs::parse_from(["ghpublish", "publish"]);
        match args.command {
            Commands::Publish(publish) => {
                assert!(publish.project_path.is_none());
                assert!(publish.repo.is_none());
                assert!(!publish.no_assist);
                assert!(!publish.release);
                assert!(publish.llm.backend.is_none());
            }
            _ => panic!("Expected Publish command"),
        }
    }

    #[test]
    fn test_publish_with_release() {
        let args = CliArgs::parse_from([
            "ghpublish",
            "publish",
            "/tmp/tool",
            "--repo",
            "tool",
            "--release",
            "--screenshot",
            "shot.png",
            "--backend",
            "openai",
        ]);
        match args.command {
            Commands::Publish(publish) => {
                assert_eq!(publish.project_path, Some(PathBuf::from("/tmp/tool")));
                assert_eq!(publish.repo.as_deref(), Some("tool"));
                assert!(publish.release);
                assert_eq!(publish.screenshot, Some(PathBuf::from("shot.png")));
                assert_eq!(publish.llm.backend, Some(AdapterKind::OpenAI));
            }
            _ => panic!("Expected Publish command"),
        }
    }

    #[test]
    fn test_screenshot_requires_release_on_publish() {
        assert!(
            CliArgs::try_parse_from(["ghpublish", "publish", "--screenshot", "a.png"]).is_err()
        );
    }

    #[test]
    fn test_release_requires_tag_or_draft() {
        assert!(CliArgs::try_parse_from(["ghpublish", "release"]).is_err());
        assert!(CliArgs::try_parse_from(["ghpublish", "release", "--draft"]).is_ok());

        let args = CliArgs::parse_from([
            "ghpublish", "release", "--tag", "v1.0.0", "--title", "First", "--notes", "- a",
        ]);
        match args.command {
            Commands::Release(release) => {
                assert_eq!(release.tag.as_deref(), Some("v1.0.0"));
                assert_eq!(release.title.as_deref(), Some("First"));
                assert_eq!(release.notes.as_deref(), Some("- a"));
            }
            _ => panic!("Expected Release command"),
        }
    }

    #[test]
    fn test_notes_conflict_with_notes_file() {
        let result = CliArgs::try_parse_from([
            "ghpublish", "release", "--tag", "v1", "--notes", "x", "--notes-file", "n.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_format() {
        let args = CliArgs::parse_from(["ghpublish", "classify", "--format", "yaml"]);
        match args.command {
            Commands::Classify(classify) => assert_eq!(classify.format, OutputFormatArg::Yaml),
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["ghpublish", "-v", "check"]);
        assert!(args.verbose);

        let args = CliArgs::parse_from(["ghpublish", "--log-level", "debug", "check"]);
        assert_eq!(args.log_level.as_deref(), Some("debug"));

        assert!(CliArgs::try_parse_from(["ghpublish", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_adapter_kind_parsing() {
        assert!(parse_adapter_kind("ollama").is_ok());
        assert!(parse_adapter_kind("anthropic").is_ok());
        assert!(parse_adapter_kind("invalid").is_err());
    }
}
