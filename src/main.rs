use ghpublish::cli::commands::{CliArgs, Commands};
use ghpublish::cli::handlers::{
    handle_check, handle_classify, handle_publish, handle_readme, handle_release,
};
use ghpublish::util::{init_logging, parse_level, LoggingConfig};
use ghpublish::{TaskRunner, VERSION};

use clap::Parser;
use std::env;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("ghpublish v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let runner = TaskRunner::new();
    let exit_code = match &args.command {
        Commands::Publish(publish_args) => handle_publish(publish_args, &runner).await,
        Commands::Release(release_args) => handle_release(release_args, &runner).await,
        Commands::Classify(classify_args) => handle_classify(classify_args),
        Commands::Readme(readme_args) => handle_readme(readme_args).await,
        Commands::Check(check_args) => handle_check(check_args),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str).unwrap_or_else(|| {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        })
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        env::var("GHPUBLISH_LOG_LEVEL")
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(Level::INFO)
    };

    let use_json = env::var("GHPUBLISH_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        include_target: args.verbose,
        include_location: false,
    });
}
