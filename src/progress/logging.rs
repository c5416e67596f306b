//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Log { message } => {
                info!(target: "ghpublish::pipeline", "{}", message);
            }
            ProgressEvent::Finished => {
                info!(target: "ghpublish::pipeline", "Pipeline finished");
            }
            ProgressEvent::Failed { error } => {
                warn!(target: "ghpublish::pipeline", error = %error, "Pipeline failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::log("Running git init"),
            ProgressEvent::Finished,
            ProgressEvent::Failed {
                error: "Test error".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
